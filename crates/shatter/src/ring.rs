//! Concentric jagged rings (one closed loop per impact level).
//!
//! Purpose
//! - Produce the polygon grid the impact engine cuts into pieces: ring `k`
//!   has `n` vertices at jittered angles, each pushed outward from the
//!   matching vertex of ring `k - 1` by a jittered radial increment.
//!
//! Model
//! - Angles: equal spacing `Δ = 2π/n` plus Gaussian noise `σ = aj% · Δ`,
//!   clipped to `±0.49 Δ` so neighbours keep their order.
//! - Increments: baseline `d` (optionally skew-inflated up to `max · d` within
//!   90° of the skew direction) plus Gaussian noise `σ = rj% · d`, clipped to
//!   `[min_scale · d, max_scale · d]`.
//! - Rings are built about the origin so nesting can add radii; callers center
//!   them on the impact point afterwards.
//!
//! Code cross-refs: `impact::Impact::generate`, `projectile::Projectile::ray_hit`

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::projectile::Projectile;
use crate::sampling::gaussian;

/// Fraction of the angular bucket the jitter may use on each side.
const ANGLE_CLIP_FRAC: f64 = 0.49;

/// Directional inflation of the radial increment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skew {
    /// Direction of maximum inflation (radians).
    pub angle: f64,
    /// Multiplier reached exactly in the skew direction.
    pub max: f64,
}

impl Skew {
    /// Skew from a drag gesture away from the impact point: the drag direction
    /// sets the angle, every 200 units of drag add one to the multiplier.
    pub fn from_drag(impact: Point, drag: Point) -> Self {
        let d = drag - impact;
        Self {
            angle: d.a(),
            max: d.r() / 1000.0 * 5.0 + 1.0,
        }
    }

    /// Linear weight: 1 in the skew direction, 0 at 90° and beyond.
    pub fn weight(&self, angle: f64) -> f64 {
        let d = angular_distance(angle, self.angle);
        if d > FRAC_PI_2 {
            0.0
        } else {
            1.0 - d / FRAC_PI_2
        }
    }

    /// Skew-inflated increment at `angle`.
    pub fn inflate(&self, increment: f64, angle: f64) -> f64 {
        (1.0 + self.weight(angle) * (self.max - 1.0)) * increment
    }
}

/// Per-ring generation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingCfg {
    pub increment: f64,
    pub divisions: usize,
    pub angular_jitter_pc: f64,
    pub radial_jitter_pc: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// `None` inherits the inner ring's skew.
    pub skew: Option<Skew>,
}

impl Default for RingCfg {
    fn default() -> Self {
        Self {
            increment: 10.0,
            divisions: 24,
            angular_jitter_pc: 30.0,
            radial_jitter_pc: 50.0,
            min_scale: 0.1,
            max_scale: 5.0,
            skew: None,
        }
    }
}

/// One closed loop of the shatter pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct JaggedRing {
    level: usize,
    angular_jitter_pc: f64,
    radial_jitter_pc: f64,
    skew: Option<Skew>,
    inner_level: Option<usize>,
    /// Closed: `points[0] == points[n]`.
    points: Vec<Point>,
}

impl JaggedRing {
    /// Build ring `level` about the origin.
    ///
    /// With an inner ring, radii accrete onto the inner ring's radii at the
    /// same index. Without one, a projectile (if any) places each vertex where
    /// the ray at its angle first meets the silhouette; rays that miss use the
    /// plain increment.
    pub fn generate<R: Rng + ?Sized>(
        level: usize,
        cfg: &RingCfg,
        inner: Option<&JaggedRing>,
        projectile: Option<&Projectile>,
        rng: &mut R,
    ) -> Self {
        let n = cfg.divisions.max(1);
        let skew = cfg.skew.or_else(|| inner.and_then(|r| r.skew));
        let mut angles = jittered_range(0.0, TAU, n, cfg.angular_jitter_pc, rng);
        angles.truncate(n);

        let increments: Vec<f64> = angles
            .iter()
            .map(|&a| {
                let d = match skew {
                    Some(s) => s.inflate(cfg.increment, a),
                    None => cfg.increment,
                };
                let noisy = gaussian(rng) * cfg.radial_jitter_pc / 100.0 * d + d;
                // inverted bounds resolve to the upper one
                noisy.max(d * cfg.min_scale).min(d * cfg.max_scale)
            })
            .collect();

        let mut points: Vec<Point> = match (inner, projectile) {
            (Some(inner), _) => angles
                .iter()
                .zip(&increments)
                .enumerate()
                .map(|(i, (&a, &inc))| {
                    let base = inner.points.get(i).map(Point::r).unwrap_or(0.0);
                    Point::polar(base + inc, a)
                })
                .collect(),
            (None, Some(proj)) => angles
                .iter()
                .zip(&increments)
                .map(|(&a, &inc)| proj.ray_hit(a).unwrap_or_else(|| Point::polar(inc, a)))
                .collect(),
            (None, None) => angles
                .iter()
                .zip(&increments)
                .map(|(&a, &inc)| Point::polar(inc, a))
                .collect(),
        };
        if let Some(&first) = points.first() {
            points.push(first);
        }

        Self {
            level,
            angular_jitter_pc: cfg.angular_jitter_pc,
            radial_jitter_pc: cfg.radial_jitter_pc,
            skew,
            inner_level: inner.map(|r| r.level),
            points,
        }
    }

    /// Translate every vertex by `center`.
    pub fn centered_on(mut self, center: Point) -> Self {
        for p in &mut self.points {
            p.translate(center);
        }
        self
    }

    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }
    #[inline]
    pub fn inner_level(&self) -> Option<usize> {
        self.inner_level
    }
    #[inline]
    pub fn skew(&self) -> Option<Skew> {
        self.skew
    }
    #[inline]
    pub fn angular_jitter_pc(&self) -> f64 {
        self.angular_jitter_pc
    }
    #[inline]
    pub fn radial_jitter_pc(&self) -> f64 {
        self.radial_jitter_pc
    }

    /// Closed loop (first point repeated at the end).
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of distinct vertices.
    #[inline]
    pub fn divisions(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Absolute angular difference folded into `[0, π]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    if d > PI {
        TAU - d
    } else {
        d
    }
}

/// `n + 1` jittered values spanning `[min, max]`.
///
/// A full turn forces the last jitter to the negation of the first so the loop
/// closes; an open range pins both endpoints.
pub fn jittered_range<R: Rng + ?Sized>(min: f64, max: f64, n: usize, aj_pc: f64, rng: &mut R) -> Vec<f64> {
    let n = n.max(1);
    let step = (max - min) / n as f64;
    let clip = ANGLE_CLIP_FRAC * step.abs();
    let full = angular_distance(min, max) < step.abs();
    let mut noise: Vec<f64> = (0..=n)
        .map(|_| (gaussian(rng) * aj_pc / 100.0 * step).clamp(-clip, clip))
        .collect();
    if full {
        noise[n] = -noise[0];
    } else {
        noise[0] = 0.0;
        noise[n] = 0.0;
    }
    noise
        .into_iter()
        .enumerate()
        .map(|(k, e)| min + step * k as f64 + e)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    proptest! {
        #[test]
        fn ring_angles_strictly_increase(seed in any::<u64>(), n in 3usize..64, aj in 0.0f64..400.0) {
            let mut rng = StdRng::seed_from_u64(seed);
            let cfg = RingCfg { divisions: n, angular_jitter_pc: aj, ..RingCfg::default() };
            let angles = jittered_range(0.0, TAU, n, aj, &mut rng);
            for w in angles.windows(2) {
                prop_assert!(w[1] > w[0]);
            }
            let ring = JaggedRing::generate(0, &cfg, None, None, &mut rng);
            prop_assert_eq!(ring.points().len(), n + 1);
            prop_assert_eq!(ring.points()[0], ring.points()[n]);
        }

        #[test]
        fn plain_radii_stay_within_scale_bounds(seed in any::<u64>(), rj in 0.0f64..500.0, inc in 0.5f64..100.0) {
            let mut rng = StdRng::seed_from_u64(seed);
            let cfg = RingCfg { increment: inc, radial_jitter_pc: rj, ..RingCfg::default() };
            let ring = JaggedRing::generate(0, &cfg, None, None, &mut rng);
            let tol = 1e-9 * inc;
            for p in ring.points() {
                prop_assert!(p.r() >= inc * cfg.min_scale - tol);
                prop_assert!(p.r() <= inc * cfg.max_scale + tol);
            }
        }
    }

    #[test]
    fn nested_ring_grows_outward() {
        let mut rng = StdRng::seed_from_u64(11);
        let cfg = RingCfg::default();
        let inner = JaggedRing::generate(0, &cfg, None, None, &mut rng);
        let outer = JaggedRing::generate(1, &cfg, Some(&inner), None, &mut rng);
        assert_eq!(outer.inner_level(), Some(0));
        for (pi, po) in inner.points().iter().zip(outer.points()) {
            assert!(po.r() >= pi.r() + cfg.increment * cfg.min_scale - 1e-9);
        }
    }

    #[test]
    fn skew_inflates_toward_direction_and_is_inherited() {
        let s = Skew { angle: 0.0, max: 4.0 };
        assert!((s.inflate(10.0, 0.0) - 40.0).abs() < 1e-12);
        assert!((s.inflate(10.0, FRAC_PI_2 / 2.0) - 25.0).abs() < 1e-12);
        assert_eq!(s.inflate(10.0, PI), 10.0);
        let dragged = Skew::from_drag(Point::new(10.0, 10.0), Point::new(10.0, 210.0));
        assert!((dragged.angle - FRAC_PI_2).abs() < 1e-12);
        assert!((dragged.max - 2.0).abs() < 1e-12);
        // wraps across ±π
        let w = Skew { angle: PI - 0.1, max: 2.0 };
        assert!(w.weight(-PI + 0.1) > 0.8);

        let mut rng = StdRng::seed_from_u64(5);
        let cfg = RingCfg { skew: Some(s), ..RingCfg::default() };
        let inner = JaggedRing::generate(0, &cfg, None, None, &mut rng);
        let plain = RingCfg::default();
        let outer = JaggedRing::generate(1, &plain, Some(&inner), None, &mut rng);
        assert_eq!(outer.skew(), Some(s));
    }

    #[test]
    fn open_range_pins_endpoints() {
        let mut rng = StdRng::seed_from_u64(2);
        let v = jittered_range(0.0, 1.0, 4, 50.0, &mut rng);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[4], 1.0);
    }

    #[test]
    fn projectile_shapes_first_ring() {
        let sq = vec![
            Point::new(-5.0, -5.0),
            Point::new(5.0, -5.0),
            Point::new(5.0, 5.0),
            Point::new(-5.0, 5.0),
        ];
        let proj = Projectile::new(sq).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let cfg = RingCfg { divisions: 8, ..RingCfg::default() };
        let ring = JaggedRing::generate(0, &cfg, None, Some(&proj), &mut rng);
        for p in ring.points() {
            let on_edge = (p.x().abs() - 5.0).abs() < 1e-9 || (p.y().abs() - 5.0).abs() < 1e-9;
            assert!(on_edge, "{p:?}");
        }
    }

    #[test]
    fn centering_translates_all_points() {
        let mut rng = StdRng::seed_from_u64(1);
        let ring = JaggedRing::generate(0, &RingCfg::default(), None, None, &mut rng);
        let first = ring.points()[0];
        let moved = ring.centered_on(Point::new(100.0, 50.0));
        assert!((moved.points()[0].x() - first.x() - 100.0).abs() < 1e-9);
        assert_eq!(moved.points()[0], moved.points()[moved.divisions()]);
    }
}
