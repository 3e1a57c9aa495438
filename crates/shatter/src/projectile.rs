//! Projectile silhouette that shapes the innermost ring.

use crate::geom::{Point, Segment};

/// Closed polygon recentred on its area centroid.
///
/// `radius` is the largest vertex distance from the centroid; rays of length
/// `2 * radius` cast from the centroid are guaranteed to leave the polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    points: Vec<Point>,
    radius: f64,
}

impl Projectile {
    /// Build from a polygon (implicitly closed). Returns `None` for fewer than
    /// three points or a zero-area polygon.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let n = points.len();
        let (mut area2, mut cx, mut cy) = (0.0, 0.0, 0.0);
        for k in 0..n {
            let (p1, p2) = (points[k], points[(k + 1) % n]);
            let cross = p1.x() * p2.y() - p2.x() * p1.y();
            area2 += cross;
            cx += (p1.x() + p2.x()) * cross;
            cy += (p1.y() + p2.y()) * cross;
        }
        if area2 == 0.0 {
            return None;
        }
        let centroid = Point::new(cx / (3.0 * area2), cy / (3.0 * area2));
        let points: Vec<Point> = points.into_iter().map(|p| p - centroid).collect();
        let radius = points.iter().map(Point::r).fold(0.0, f64::max);
        Some(Self { points, radius })
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Rotate about the centroid (origin).
    pub fn rotate(&mut self, angle: f64) {
        let o = Point::origin();
        for p in &mut self.points {
            p.rotate(o, angle);
        }
    }

    pub fn scale(&mut self, k: f64) {
        for p in &mut self.points {
            p.scale(k);
        }
        self.radius *= k;
    }

    /// Closed boundary, last point joined back to the first.
    pub fn segments(&self) -> Vec<Segment> {
        let n = self.points.len();
        (0..n)
            .map(|k| Segment::new(self.points[k], self.points[(k + 1) % n]))
            .collect()
    }

    /// First boundary hit of the ray from the centroid at `angle`.
    pub fn ray_hit(&self, angle: f64) -> Option<Point> {
        let ray = Segment::new(Point::origin(), Point::polar(self.radius * 2.0, angle));
        self.segments()
            .iter()
            .filter(|s| ray.intersects(s))
            .find_map(|s| ray.intersection_point(s))
    }
}
