//! Stateless line segment between two points.

use std::f64::consts::{PI, TAU};

use super::Point;

/// Ordered pair of points. All predicates are pure functions of the endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    #[inline]
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.p1.dist(self.p2)
    }

    /// Direction angle of `p1 → p2` in `(-π, π]`.
    #[inline]
    pub fn angle(&self) -> f64 {
        (self.p2.y() - self.p1.y()).atan2(self.p2.x() - self.p1.x())
    }

    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.p2, self.p1)
    }

    /// Closest point of the segment to `p` (clamped projection).
    pub fn closest_point(&self, p: Point) -> Point {
        let d = self.p2.to_vec() - self.p1.to_vec();
        let len_sq = d.norm_squared();
        if len_sq == 0.0 {
            return self.p1;
        }
        let t = ((p.to_vec() - self.p1.to_vec()).dot(&d) / len_sq).clamp(0.0, 1.0);
        Point::from(self.p1.to_vec() + d * t)
    }

    /// Minimum distance from `p` to the segment.
    pub fn dist_to_point(&self, p: Point) -> f64 {
        self.closest_point(p).dist(p)
    }

    /// Minimum distance between two segments; 0 when they cross.
    pub fn dist_to_segment(&self, other: &Segment) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }
        [
            self.dist_to_point(other.p1),
            self.dist_to_point(other.p2),
            other.dist_to_point(self.p1),
            other.dist_to_point(self.p2),
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min)
    }

    /// Closed intersection test (touching endpoints count). Parallel segments never intersect.
    pub fn intersects(&self, other: &Segment) -> bool {
        let (x11, y11) = self.p1.xy();
        let (x12, y12) = self.p2.xy();
        let (x21, y21) = other.p1.xy();
        let (x22, y22) = other.p2.xy();
        let dx1 = x12 - x11;
        let dy1 = y12 - y11;
        let dx2 = x22 - x21;
        let dy2 = y22 - y21;
        let delta = dx2 * dy1 - dy2 * dx1;
        if delta == 0.0 {
            return false;
        }
        let s = (dx1 * (y21 - y11) + dy1 * (x11 - x21)) / delta;
        let t = (dx2 * (y11 - y21) + dy2 * (x21 - x11)) / (-delta);
        (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
    }

    /// Intersection of the two supporting lines, `None` if parallel.
    pub fn intersection_point(&self, other: &Segment) -> Option<Point> {
        let (x1, y1) = self.p1.xy();
        let (x2, y2) = self.p2.xy();
        let (x3, y3) = other.p1.xy();
        let (x4, y4) = other.p2.xy();
        let den = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if den == 0.0 {
            return None;
        }
        let c1 = x1 * y2 - y1 * x2;
        let c2 = x3 * y4 - y3 * x4;
        let px = (c1 * (x3 - x4) - (x1 - x2) * c2) / den;
        let py = (c1 * (y3 - y4) - (y1 - y2) * c2) / den;
        Some(Point::new(px, py))
    }

    /// True when any two of the four endpoints coincide.
    ///
    /// A zero-length segment therefore shares a point with everything.
    pub fn shares_endpoint(&self, other: &Segment) -> bool {
        let pts = [self.p1, self.p2, other.p1, other.p2];
        (0..4).any(|i| (i + 1..4).any(|j| pts[i] == pts[j]))
    }

    /// Opening angle in `[0, π]` between two segments that share an endpoint,
    /// measured with both segments oriented away from the shared point.
    pub fn angle_to(&self, other: &Segment) -> Option<f64> {
        let shared = [self.p1, self.p2]
            .into_iter()
            .find(|p| *p == other.p1 || *p == other.p2)?;
        let s1 = if self.p1 == shared { *self } else { self.reversed() };
        let s2 = if other.p1 == shared {
            *other
        } else {
            other.reversed()
        };
        let mut d = (s1.angle() - s2.angle()).abs() % TAU;
        if d > PI {
            d = TAU - d;
        }
        Some(d)
    }
}
