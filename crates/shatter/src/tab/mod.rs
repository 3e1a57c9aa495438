//! Tabs: the cut edges between adjacent grid vertices.
//!
//! Purpose
//! - A `Tab` is an anchored polyline from one grid vertex to the next. Only
//!   the interior points depend on the shape variant; the anchors are shared
//!   with the neighbouring tabs and are never moved by shape synthesis.
//!
//! Why this design
//! - Shape synthesis (`synth.rs`) is separate from the geometric queries below
//!   so DRC code only depends on the read side.
//! - Segments and centroid are recomputed eagerly after every mutation; tabs
//!   have at most a handful of points and are read far more often than written.
//!
//! Code cross-refs: `impact::Impact` (grid owner), `drc` (all queries),
//! `TabPrototype` (library shapes).

mod prototype;
mod synth;
mod types;

pub use prototype::TabPrototype;
pub use types::{Axis, EdgeDraft, ShapeOdds, TabCfg, TabKey, TabShape};

use crate::geom::{Point, Segment};

/// One cut edge of the ring grid.
///
/// Invariant: `points.len() >= 2`; `segments` and `centroid` mirror `points`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tab {
    shape: TabShape,
    points: Vec<Point>,
    ring: usize,
    division: usize,
    axis: Axis,
    scaled_length: f64,
    segments: Vec<Segment>,
    centroid: Point,
}

impl Tab {
    /// Straight tab between two anchors. `scaled_length <= 0` means the span.
    pub fn new(p1: Point, p2: Point, ring: usize, division: usize, axis: Axis, scaled_length: f64) -> Self {
        let mut tab = Self {
            shape: TabShape::Line,
            points: vec![p1, p2],
            ring,
            division,
            axis,
            scaled_length: 0.0,
            segments: Vec::new(),
            centroid: Point::origin(),
        };
        tab.set_scaled_length(scaled_length);
        tab.refresh();
        tab
    }

    /// Rebuild a tab from stored points (document load). `None` below two points.
    pub fn from_points(
        shape: TabShape,
        points: Vec<Point>,
        ring: usize,
        division: usize,
        axis: Axis,
        scaled_length: f64,
    ) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let mut tab = Self {
            shape,
            points,
            ring,
            division,
            axis,
            scaled_length,
            segments: Vec::new(),
            centroid: Point::origin(),
        };
        if shape == TabShape::Gap {
            tab.make_gap();
        } else {
            tab.refresh();
        }
        Some(tab)
    }

    #[inline]
    pub fn shape(&self) -> TabShape {
        self.shape
    }
    /// True only for `Gap`: no physical cut.
    #[inline]
    pub fn is_gap(&self) -> bool {
        self.shape == TabShape::Gap
    }
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    #[inline]
    pub fn first(&self) -> Point {
        self.points[0]
    }
    #[inline]
    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }
    /// Level of the ring that generated this tab.
    #[inline]
    pub fn ring(&self) -> usize {
        self.ring
    }
    #[inline]
    pub fn division(&self) -> usize {
        self.division
    }
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }
    #[inline]
    pub fn scaled_length(&self) -> f64 {
        self.scaled_length
    }
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
    /// Mean of the points.
    #[inline]
    pub fn centroid(&self) -> Point {
        self.centroid
    }

    /// Distance between the anchors.
    #[inline]
    pub fn span(&self) -> f64 {
        self.first().dist(self.last())
    }

    /// Direction of the chord `first → last`.
    #[inline]
    pub fn chord_angle(&self) -> f64 {
        Segment::new(self.first(), self.last()).angle()
    }

    /// Clamp to the span; `<= 0` resets to the span.
    pub fn set_scaled_length(&mut self, scaled_length: f64) {
        let span = self.span();
        self.scaled_length = if scaled_length > 0.0 {
            span.min(scaled_length)
        } else {
            span
        };
    }

    /// Drop interior points; the tab no longer cuts.
    pub fn make_gap(&mut self) {
        self.keep_anchors();
        self.shape = TabShape::Gap;
        self.refresh();
    }

    /// Drop interior points; straight cut.
    pub fn make_line(&mut self) {
        self.keep_anchors();
        self.shape = TabShape::Line;
        self.refresh();
    }

    /// Point-reflect the interior about the chord midpoint and reverse it.
    pub fn flip(&mut self) {
        let n = self.points.len();
        if n > 2 {
            let shift = self.first() + self.last();
            for p in &mut self.points[1..n - 1] {
                *p = shift - *p;
            }
            self.points[1..n - 1].reverse();
            self.refresh();
        }
    }

    /// Whether two non-touching segments of this tab cross.
    pub fn self_intersects(&self) -> bool {
        let segs = &self.segments;
        segs.iter().enumerate().any(|(i, s1)| {
            segs[i + 1..]
                .iter()
                .any(|s2| !s1.shares_endpoint(s2) && s1.intersects(s2))
        })
    }

    /// Whether any non-touching segment pair of the two tabs crosses.
    pub fn intersects(&self, other: &Tab) -> bool {
        self.segments.iter().any(|s1| {
            other
                .segments
                .iter()
                .any(|s2| !s1.shares_endpoint(s2) && s1.intersects(s2))
        })
    }

    /// Smallest clearance between non-adjacent segments.
    ///
    /// A single segment reports its length; `∞` if every pair touches.
    pub fn self_distance(&self) -> f64 {
        if self.segments.len() < 2 {
            return self.segments.first().map_or(0.0, Segment::length);
        }
        let segs = &self.segments;
        let mut best = f64::INFINITY;
        for (i, s1) in segs.iter().enumerate() {
            for s2 in &segs[i + 1..] {
                if !s1.shares_endpoint(s2) {
                    best = best.min(s1.dist_to_segment(s2));
                }
            }
        }
        best
    }

    /// Minimum distance between non-touching segments of two tabs.
    ///
    /// With `ignore_outer`, crossing tabs report 0 and the first and last
    /// segment of tabs with more than two segments are left out. Pairs that
    /// share a point never count; `∞` if no pair remains.
    pub fn dist_to_tab(&self, other: &Tab, ignore_outer: bool) -> f64 {
        let mut s1 = &self.segments[..];
        let mut s2 = &other.segments[..];
        if ignore_outer {
            if self.intersects(other) {
                return 0.0;
            }
            s1 = inner_segments(s1);
            s2 = inner_segments(s2);
        }
        let mut best = f64::INFINITY;
        for a in s1 {
            for b in s2 {
                if !a.shares_endpoint(b) {
                    best = best.min(a.dist_to_segment(b));
                }
            }
        }
        best
    }

    /// Angle at the first shared anchor between the end segments of two tabs.
    pub fn angle_to_tab(&self, other: &Tab) -> Option<f64> {
        let ends = |t: &Tab| -> [Segment; 2] {
            let s = &t.segments;
            [s[0], s[s.len() - 1]]
        };
        let mine = ends(self);
        let theirs = ends(other);
        mine.iter()
            .flat_map(|a| theirs.iter().map(move |b| (a, b)))
            .find(|(a, b)| a.shares_endpoint(b))
            .and_then(|(a, b)| a.angle_to(b))
    }

    /// Whether the two tabs have a common anchor.
    pub fn shares_endpoint_with(&self, other: &Tab) -> bool {
        [self.first(), self.last()]
            .iter()
            .any(|p| *p == other.first() || *p == other.last())
    }

    /// Rectangle aligned with the chord enclosing all points.
    ///
    /// Nearly flat tabs get a minimum thickness of a tenth of the span.
    pub fn bounding_box(&self) -> [Point; 4] {
        let p0 = self.first();
        let angle = self.chord_angle();
        let local: Vec<Point> = self.points.iter().map(|p| p.rotated(p0, -angle)).collect();
        let (mut miny, mut maxy) = local
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y()), hi.max(p.y())));
        let span = self.span();
        if (maxy - miny).abs() < span / 10.0 {
            maxy += span / 20.0;
            miny -= span / 20.0;
        }
        let x0 = local[0].x();
        let x1 = local[local.len() - 1].x();
        [
            Point::new(x0, maxy),
            Point::new(x1, maxy),
            Point::new(x1, miny),
            Point::new(x0, miny),
        ]
        .map(|p| p.rotated(p0, angle))
    }

    fn keep_anchors(&mut self) {
        let (p1, p2) = (self.first(), self.last());
        self.points = vec![p1, p2];
    }

    /// Install a new point list, pinning the ends to the old anchors.
    fn set_shape_points(&mut self, shape: TabShape, mut points: Vec<Point>) {
        let (p1, p2) = (self.first(), self.last());
        if let Some(first) = points.first_mut() {
            *first = p1;
        }
        if let Some(last) = points.last_mut() {
            *last = p2;
        }
        if points.len() < 2 {
            points = vec![p1, p2];
        }
        self.points = points;
        self.shape = shape;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.segments = self
            .points
            .windows(2)
            .map(|w| Segment::new(w[0], w[1]))
            .collect();
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x(), sy + p.y()));
        self.centroid = Point::new(sx / n, sy / n);
    }
}

fn inner_segments(segs: &[Segment]) -> &[Segment] {
    if segs.len() > 2 {
        &segs[1..segs.len() - 1]
    } else {
        segs
    }
}
