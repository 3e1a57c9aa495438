//! Axis-aligned rectangular frame that bounds the cut pattern.

use crate::geom::{Point, Segment};

/// Rectangle given by two opposite corners, normalized to `(min, max)`.
///
/// Sides are ordered: left, right, top (min y), bottom (max y).
#[derive(Clone, Debug, PartialEq)]
pub struct RectangularFrame {
    min: Point,
    max: Point,
    sides: [Segment; 4],
}

impl RectangularFrame {
    pub fn new(c1: Point, c2: Point) -> Self {
        let min = Point::new(c1.x().min(c2.x()), c1.y().min(c2.y()));
        let max = Point::new(c1.x().max(c2.x()), c1.y().max(c2.y()));
        let sides = [
            Segment::new(min, Point::new(min.x(), max.y())),
            Segment::new(Point::new(max.x(), min.y()), max),
            Segment::new(min, Point::new(max.x(), min.y())),
            Segment::new(Point::new(min.x(), max.y()), max),
        ];
        Self { min, max, sides }
    }

    #[inline]
    pub fn min_corner(&self) -> Point {
        self.min
    }
    #[inline]
    pub fn max_corner(&self) -> Point {
        self.max
    }
    #[inline]
    pub fn sides(&self) -> &[Segment; 4] {
        &self.sides
    }
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x() - self.min.x()
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y() - self.min.y()
    }

    /// Point-inside test; `strict` excludes the border.
    pub fn contains(&self, p: Point, strict: bool) -> bool {
        if strict {
            self.min.x() < p.x() && p.x() < self.max.x() && self.min.y() < p.y() && p.y() < self.max.y()
        } else {
            self.min.x() <= p.x()
                && p.x() <= self.max.x()
                && self.min.y() <= p.y()
                && p.y() <= self.max.y()
        }
    }

    /// Exact test against the four side axes (clipped points are snapped, so `==` is reliable).
    pub fn on_border(&self, p: Point) -> bool {
        p.x() == self.min.x() || p.x() == self.max.x() || p.y() == self.min.y() || p.y() == self.max.y()
    }

    /// True if any interior point (all but first and last) lies outside the frame.
    pub fn escapes(&self, points: &[Point]) -> bool {
        if points.len() < 3 {
            return false;
        }
        points[1..points.len() - 1]
            .iter()
            .any(|p| !self.contains(*p, false))
    }

    /// True if any segment crosses a side without sharing an endpoint with it.
    pub fn crossed_by(&self, segments: &[Segment]) -> bool {
        self.sides.iter().any(|side| {
            segments
                .iter()
                .any(|s| !side.shares_endpoint(s) && side.intersects(s))
        })
    }

    /// Move `p` onto the border along the line from `prev` if it lies outside.
    ///
    /// The result is snapped onto the crossed side's axis so later exact
    /// `on_border` checks hold. If no side is crossed, `p` is returned as is.
    pub fn clip_to_border(&self, p: Point, prev: Point) -> Point {
        if self.contains(p, false) {
            return p;
        }
        let ray = Segment::new(prev, p);
        let hit = self
            .sides
            .iter()
            .filter(|side| side.intersects(&ray))
            .find_map(|side| ray.intersection_point(side).map(|pt| (pt, side)));
        let Some((pt, side)) = hit else {
            return p;
        };
        let mut x = pt.x();
        let mut y = pt.y();
        if side.p1.x() == side.p2.x() {
            x = side.p1.x();
        }
        if side.p1.y() == side.p2.y() {
            y = side.p1.y();
        }
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> RectangularFrame {
        RectangularFrame::new(Point::new(100.0, 100.0), Point::new(0.0, 0.0))
    }

    #[test]
    fn corners_are_normalized() {
        let f = square();
        assert_eq!(f.min_corner(), Point::new(0.0, 0.0));
        assert_eq!(f.max_corner(), Point::new(100.0, 100.0));
        assert_eq!(f.width(), 100.0);
    }

    #[test]
    fn inside_strict_and_inclusive() {
        let f = square();
        let edge = Point::new(0.0, 50.0);
        assert!(f.contains(edge, false));
        assert!(!f.contains(edge, true));
        assert!(f.on_border(edge));
        assert!(!f.on_border(Point::new(1.0, 50.0)));
    }

    #[test]
    fn clip_snaps_to_side() {
        let f = square();
        let inside = Point::new(50.0, 50.0);
        let outside = Point::new(150.0, 80.0);
        let c = f.clip_to_border(outside, inside);
        assert_eq!(c.x(), 100.0);
        assert!((c.y() - 65.0).abs() < 1e-9);
        assert!(f.on_border(c));
        // inside points are untouched
        assert_eq!(f.clip_to_border(inside, outside), inside);
    }

    #[test]
    fn escapes_checks_interior_points_only() {
        let f = square();
        let mut pts = vec![
            Point::new(-10.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(30.0, 30.0),
        ];
        assert!(!f.escapes(&pts));
        pts[2] = Point::new(150.0, 50.0);
        assert!(f.escapes(&pts));
    }

    #[test]
    fn crossed_by_ignores_contact_at_a_corner() {
        let f = square();
        let crossing = [Segment::new(Point::new(50.0, 50.0), Point::new(150.0, 50.0))];
        assert!(f.crossed_by(&crossing));

        let to_corner = [Segment::new(Point::new(50.0, 50.0), Point::new(100.0, 100.0))];
        assert!(!f.crossed_by(&to_corner));

        let inside = [
            Segment::new(Point::new(10.0, 10.0), Point::new(90.0, 20.0)),
            Segment::new(Point::new(90.0, 20.0), Point::new(40.0, 80.0)),
        ];
        assert!(!f.crossed_by(&inside));
        assert!(!f.crossed_by(&[]));
    }
}
