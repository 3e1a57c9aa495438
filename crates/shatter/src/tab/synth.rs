//! Shape synthesis: jagged, fracture and prototype tabs.
//!
//! Every generator builds the shape in a local frame, moves it onto the chord
//! and then pins the first and last point back onto the anchors, so rounding in
//! the rigid transform never detaches a tab from its neighbours.

use std::f64::consts::PI;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{EdgeDraft, ShapeOdds, Tab, TabCfg, TabPrototype, TabShape};
use crate::frame::RectangularFrame;
use crate::geom::Point;
use crate::sampling::{coin, uniform};

impl Tab {
    /// Draw the tab for one grid edge.
    ///
    /// Returns `None` when both endpoints lie outside the frame; otherwise each
    /// endpoint is clipped onto the border along the edge before the shape is
    /// chosen: gap, library prototype (randomly mirrored), jagged (randomly
    /// inverted) or fracture.
    pub fn synthesize<R: Rng + ?Sized>(
        frame: &RectangularFrame,
        edge: &EdgeDraft,
        cfg: &TabCfg,
        odds: &ShapeOdds,
        library: &[TabPrototype],
        rng: &mut R,
    ) -> Option<Tab> {
        if !frame.contains(edge.p1, false) && !frame.contains(edge.p2, false) {
            return None;
        }
        let p1 = frame.clip_to_border(edge.p1, edge.p2);
        let p2 = frame.clip_to_border(edge.p2, edge.p1);
        let mut tab = Tab::new(p1, p2, edge.ring, edge.division, edge.axis, edge.scaled_length);

        if rng.gen::<f64>() < odds.gap {
            tab.make_gap();
            return Some(tab);
        }
        if !library.is_empty() && rng.gen::<f64>() < odds.prototype {
            if let Some(proto) = library.choose(rng) {
                tab.make_from_prototype(proto, cfg.seg_jitter_pc, rng);
                if coin(rng) {
                    tab.flip();
                }
                return Some(tab);
            }
        }
        if odds.allow_jagged && rng.gen::<f64>() > odds.not_jagged {
            let invert = coin(rng);
            tab.make_jagged(cfg, invert, rng);
        } else {
            tab.make_fracture(cfg.fracture_points, cfg.seg_jitter_pc, rng);
        }
        Some(tab)
    }

    /// Six-point interlocking tab (degrades to `Line` on short chords).
    ///
    /// The neck is sized from the scaled length, so tabs on irregular cells
    /// keep proportions consistent with their neighbours.
    pub fn make_jagged<R: Rng + ?Sized>(&mut self, cfg: &TabCfg, invert: bool, rng: &mut R) {
        let span = self.span();
        if span * cfg.bottom_frac < cfg.min_chord {
            self.make_line();
            return;
        }
        if self.scaled_length * cfg.bottom_frac < cfg.min_chord {
            self.scaled_length = span;
        }
        let sl = self.scaled_length;
        let angle = self.chord_angle();
        let pp1 = Point::new(-span / 2.0, 0.0);
        let pp2 = Point::new(span / 2.0, 0.0);

        let half_flare = (cfg.top_frac - cfg.bottom_frac) / 2.0;
        let side = (span - sl * cfg.bottom_frac) / 2.0;
        let neck_angle = cfg.depth.atan2(half_flare);
        let neck = (cfg.depth * sl).hypot(half_flare * sl);
        let sj = cfg.seg_jitter_pc / 100.0;
        let aj = cfg.angle_jitter * PI;

        let r1 = uniform(rng, side * (1.0 - sj), side * (1.0 + sj));
        let a1 = uniform(rng, -aj, aj);
        let r2 = uniform(rng, neck, neck * (1.0 + 2.0 * sj));
        let c2 = PI - a1 - neck_angle;
        let mut a2 = uniform(rng, c2 - aj, c2 + aj);
        let r3 = uniform(rng, side * (1.0 - sj), side * (1.0 + sj));
        let a3 = uniform(rng, -aj, aj);
        let r4 = uniform(rng, neck, neck * (1.0 + 2.0 * sj));
        let c4 = PI - a3 - neck_angle;
        let mut a4 = -uniform(rng, c4 - aj, c4 + aj);
        if invert {
            a2 = -a2;
            a4 = -a4;
        }

        let left = pp1 + Point::polar(r1, a1);
        let right = pp2 - Point::polar(r3, a3);
        let local = [
            pp1,
            left,
            left + Point::polar(r2, a2),
            right - Point::polar(r4, a4),
            right,
            pp2,
        ];
        let shift = self.first() - pp1;
        let points = local
            .iter()
            .map(|p| p.rotated(pp1, angle).translated(shift))
            .collect();
        self.set_shape_points(TabShape::Jagged, points);
    }

    /// `k` evenly spaced chord points, each jittered by `±jitter_pc %` of the span.
    pub fn make_fracture<R: Rng + ?Sized>(&mut self, k: usize, jitter_pc: f64, rng: &mut R) {
        if k == 0 {
            self.make_line();
            return;
        }
        let (p1, p2) = (self.first(), self.last());
        let amp = self.span() * jitter_pc / 100.0;
        let mut points = Vec::with_capacity(k + 2);
        points.push(p1);
        for m in 1..=k {
            let t = m as f64 / (k + 1) as f64;
            let x = p1.x() + (p2.x() - p1.x()) * t + uniform(rng, -amp, amp);
            let y = p1.y() + (p2.y() - p1.y()) * t + uniform(rng, -amp, amp);
            points.push(Point::new(x, y));
        }
        points.push(p2);
        self.set_shape_points(TabShape::Fracture, points);
    }

    /// Copy a normalized prototype onto the chord.
    ///
    /// Each point's radius (relative to the prototype origin) is perturbed by
    /// up to `±jitter_pc %` before scaling to the span.
    pub fn make_from_prototype<R: Rng + ?Sized>(&mut self, proto: &TabPrototype, jitter_pc: f64, rng: &mut R) {
        let span = self.span();
        let angle = self.chord_angle();
        let scaled: Vec<Point> = proto
            .points()
            .iter()
            .map(|p| {
                let r = p.r() + uniform(rng, -p.r(), p.r()) * jitter_pc / 100.0;
                Point::polar(r, p.a()) * span
            })
            .collect();
        let Some(&origin) = scaled.first() else {
            self.make_line();
            return;
        };
        let shift = self.first() - origin;
        let points = scaled
            .iter()
            .map(|p| p.rotated(origin, angle).translated(shift))
            .collect();
        self.set_shape_points(proto.shape(), points);
    }

    /// Redraw in the current variant (`Line` gets a fresh jagged attempt).
    pub fn remake<R: Rng + ?Sized>(&mut self, cfg: &TabCfg, rng: &mut R) {
        match self.shape {
            TabShape::Gap => self.make_gap(),
            TabShape::Fracture => self.make_fracture(cfg.fracture_points, cfg.seg_jitter_pc, rng),
            TabShape::Jagged | TabShape::Line => self.make_jagged(cfg, false, rng),
        }
    }
}
