//! Normalized tab shapes loaded from a library.

use super::{Axis, Tab, TabShape};
use crate::geom::{Point, Segment};

/// Tab shape on the unit chord `(0, 0) → (1, 0)`.
#[derive(Clone, Debug, PartialEq)]
pub struct TabPrototype {
    shape: TabShape,
    points: Vec<Point>,
    min_distance: f64,
}

impl TabPrototype {
    /// Normalize `points` onto the unit chord. `None` for fewer than two points
    /// or coincident ends.
    pub fn new(shape: TabShape, points: &[Point]) -> Option<Self> {
        let (&p0, &pn) = (points.first()?, points.last()?);
        if points.len() < 2 {
            return None;
        }
        let span = p0.dist(pn);
        if span == 0.0 {
            return None;
        }
        let angle = Segment::new(p0, pn).angle();
        let mut normalized: Vec<Point> = points
            .iter()
            .map(|p| (*p - p0).rotated(Point::origin(), -angle) * (1.0 / span))
            .collect();
        let last = normalized.len() - 1;
        normalized[0] = Point::origin();
        normalized[last] = Point::new(1.0, 0.0);
        let min_distance = Tab::from_points(shape, normalized.clone(), 0, 0, Axis::Angular, 1.0)
            .map_or(0.0, |t| t.self_distance());
        Some(Self {
            shape,
            points: normalized,
            min_distance,
        })
    }

    /// Classify a hand-drawn stroke: flat → `Line`, any backtracking along the
    /// chord → `Jagged`, otherwise `Fracture`.
    pub fn from_sketch(points: &[Point]) -> Option<Self> {
        let (&p0, &pn) = (points.first()?, points.last()?);
        let angle = Segment::new(p0, pn).angle();
        let local: Vec<Point> = points.iter().map(|p| p.rotated(p0, -angle)).collect();
        let y0 = local[0].y();
        let shape = if local.iter().all(|p| (p.y() - y0).abs() < 1e-9) {
            TabShape::Line
        } else if local.windows(2).any(|w| w[0].x() > w[1].x()) {
            TabShape::Jagged
        } else {
            TabShape::Fracture
        };
        Self::new(shape, points)
    }

    /// Capture an existing tab's shape.
    pub fn from_tab(tab: &Tab) -> Option<Self> {
        Self::new(tab.shape(), tab.points())
    }

    #[inline]
    pub fn shape(&self) -> TabShape {
        self.shape
    }
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    /// Clearance between non-adjacent segments on the unit chord.
    #[inline]
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }
}
