//! Impact generation: ring schedule, tab filling and cropping.

use rand::Rng;
use tracing::debug;

use super::{Impact, ShatterParams, TabGrid};
use crate::frame::RectangularFrame;
use crate::projectile::Projectile;
use crate::ring::{JaggedRing, RingCfg};
use crate::sampling::geomspace;
use crate::tab::{Axis, EdgeDraft, ShapeOdds, Tab, TabCfg, TabKey, TabPrototype};

/// Radial increment of every ring: the first ring's radius, then the
/// progression's differences shifted so the smallest equals `first_delta`.
pub fn ring_increments(r0: f64, r1: f64, n: usize, first_delta: f64) -> Vec<f64> {
    let radii = geomspace(r0.min(r1), r0.max(r1), n);
    let Some(&first) = radii.first() else {
        return Vec::new();
    };
    let diffs: Vec<f64> = radii.windows(2).map(|w| w[1] - w[0]).collect();
    let min_diff = diffs.iter().copied().fold(f64::INFINITY, f64::min);
    let mut out = Vec::with_capacity(n);
    out.push(first);
    out.extend(diffs.iter().map(|d| d + first_delta - min_diff));
    out
}

impl Impact {
    /// Generate a new impact pattern.
    ///
    /// Rings are built about the origin (ring 0 shaped by the projectile when
    /// given), centered on `params.center`, then walked from the outermost
    /// ring inward; each ring contributes its radial tabs (towards the inner
    /// ring) and its angular tabs. The grid is cropped to the leading block of
    /// divisions and rings that produced any tab.
    pub fn generate<R: Rng + ?Sized>(
        frame: RectangularFrame,
        projectile: Option<&Projectile>,
        library: &[TabPrototype],
        params: &ShatterParams,
        tab_cfg: &TabCfg,
        rng: &mut R,
    ) -> Impact {
        let n = params.rings;
        let ndiv = params.divisions.max(1);
        let increments = ring_increments(params.impact_radius[0], params.impact_radius[1], n, params.first_ring_delta);
        let rjs = geomspace(params.radial_jitter_pc[0], params.radial_jitter_pc[1], n);
        let ajs = geomspace(params.angular_jitter_pc[0], params.angular_jitter_pc[1], n);

        let mut rings: Vec<JaggedRing> = Vec::with_capacity(n);
        for level in 0..n {
            let cfg = RingCfg {
                increment: increments[level],
                divisions: ndiv,
                angular_jitter_pc: ajs[level],
                radial_jitter_pc: rjs[level],
                min_scale: params.min_scale,
                max_scale: params.max_scale,
                skew: params.skew,
            };
            let ring = JaggedRing::generate(level, &cfg, rings.last(), projectile, rng);
            rings.push(ring);
        }
        let center = params.center_point();
        let rings: Vec<JaggedRing> = rings.into_iter().map(|r| r.centered_on(center)).collect();

        let (grid, produced) = fill_tabs(&frame, &rings, ndiv, params, tab_cfg, library, rng);
        let grid = match produced {
            Some((max_div, max_ring)) => grid.cropped(max_div + 1, max_ring + 1),
            None => TabGrid::new(0, 0),
        };
        debug!(
            rings = n,
            divisions = ndiv,
            rows = grid.rows(),
            columns = grid.columns(),
            tabs = grid.len(),
            "impact grid filled"
        );

        let impact = Impact::from_grid(ndiv, frame, grid);
        debug!(pieces = impact.piece_count(), "impact connectivity derived");
        impact
    }
}

/// Fill a `ndiv × rings × 2` grid; returns it with the largest
/// `(division, ring)` that produced a tab.
fn fill_tabs<R: Rng + ?Sized>(
    frame: &RectangularFrame,
    rings: &[JaggedRing],
    ndiv: usize,
    params: &ShatterParams,
    cfg: &TabCfg,
    library: &[TabPrototype],
    rng: &mut R,
) -> (TabGrid, Option<(usize, usize)>) {
    let mut grid = TabGrid::new(ndiv, rings.len());
    let mut produced: Option<(usize, usize)> = None;

    for (level, ring) in rings.iter().enumerate().rev() {
        let pts = ring.points();
        let inner = level.checked_sub(1).map(|k| &rings[k]);
        for i in 0..ring.divisions().min(ndiv) {
            let (p1, p2) = (pts[i], pts[i + 1]);
            let mut any = false;

            let (scaled_length, odds) = match inner {
                Some(inner) => {
                    let ipts = inner.points();
                    let (ip1, ip2) = (ipts[i], ipts[i + 1]);
                    let sl = (p1.dist(p2) + p2.dist(ip2) + p1.dist(ip1) + ip1.dist(ip2)) / 4.0;
                    let radial = EdgeDraft {
                        p1: ip1,
                        p2: p1,
                        ring: level,
                        division: i,
                        axis: Axis::Radial,
                        scaled_length: sl,
                    };
                    let odds = ShapeOdds {
                        gap: params.p_no_radial,
                        not_jagged: params.p_not_jagged,
                        prototype: params.p_prototype,
                        allow_jagged: true,
                    };
                    let tab = Tab::synthesize(frame, &radial, cfg, &odds, library, rng);
                    any |= tab.is_some();
                    grid.set(TabKey::new(i, level - 1, Axis::Radial.slot()), tab);
                    (sl, ShapeOdds { gap: params.p_no_ring, ..odds })
                }
                None => (
                    0.0,
                    ShapeOdds {
                        gap: 0.0,
                        not_jagged: params.p_not_jagged,
                        prototype: 0.0,
                        allow_jagged: false,
                    },
                ),
            };

            let angular = EdgeDraft {
                p1,
                p2,
                ring: level,
                division: i,
                axis: Axis::Angular,
                scaled_length,
            };
            let tab = Tab::synthesize(frame, &angular, cfg, &odds, library, rng);
            any |= tab.is_some();
            grid.set(TabKey::new(i, level, Axis::Angular.slot()), tab);

            if any {
                produced = Some(match produced {
                    Some((d, r)) => (d.max(i), r.max(level)),
                    None => (i, level),
                });
            }
        }
    }
    (grid, produced)
}
