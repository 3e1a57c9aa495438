//! The DRC pass: single-tab, tab-frame, tab-tab and piece rules.

use tracing::info;

use super::{summary, DrcCfg, DrcError, DrcKind, Entity};
use crate::frame::RectangularFrame;
use crate::impact::Impact;
use crate::piece::PieceId;
use crate::tab::{Tab, TabKey, TabShape};

impl Impact {
    /// Run every rule on the current grid and store the result.
    ///
    /// Order: per-tab rules (short, self-intersection, frame escape, frame
    /// clearance) in key order, then tab pairs in key order, then pieces
    /// (after re-deriving connectivity).
    pub fn drc(&mut self, cfg: &DrcCfg) -> &[DrcError] {
        let mut errors = Vec::new();
        let frame = self.frame();
        for (key, tab) in self.tabs().filter(|(_, t)| !t.is_gap()) {
            errors.extend(single_tab_check(key, tab, cfg, frame));
            errors.extend(tab_frame_check(key, tab, cfg, frame));
        }

        let tabs: Vec<(TabKey, &Tab)> = self.tabs().filter(|(_, t)| !t.is_gap()).collect();
        for (n, &(k1, t1)) in tabs.iter().enumerate() {
            for &(k2, t2) in &tabs[n + 1..] {
                errors.extend(two_tab_check((k1, t1), (k2, t2), cfg, self.ndiv()));
            }
        }

        self.recompute_pieces();
        for idx in 0..self.piece_count() {
            let id = PieceId(idx);
            let border = self.piece_border(id);
            let jagged = border
                .iter()
                .filter(|k| self.tab(**k).is_some_and(|t| t.shape() == TabShape::Jagged))
                .count();
            if let Some(err) = piece_check(id, border.len(), jagged) {
                errors.push(err);
            }
        }

        let s = summary(&errors);
        info!(
            total = s.total,
            short_tab = s.short_tab,
            self_intersection = s.self_intersection,
            intersection = s.intersection,
            frame_intersection = s.frame_intersection,
            distance = s.distance,
            acute = s.acute,
            unsupported = s.unsupported,
            "drc"
        );
        self.set_errors(errors);
        self.drc_errors()
    }
}

/// ShortTab, SelfIntersection and FrameIntersection for one cutting tab.
pub fn single_tab_check(key: TabKey, tab: &Tab, cfg: &DrcCfg, frame: &RectangularFrame) -> Vec<DrcError> {
    let mut out = Vec::new();
    let span = tab.span();
    if tab.ring() > 0
        && span < cfg.min_tab_length
        && (frame.on_border(tab.first()) || frame.on_border(tab.last()))
    {
        out.push(DrcError::single(DrcKind::ShortTab, Entity::Tab(key), Some(span)));
    }
    if tab.self_intersects() {
        out.push(DrcError::single(DrcKind::SelfIntersection, Entity::Tab(key), None));
    }
    if frame.escapes(tab.points()) {
        out.push(DrcError::single(DrcKind::FrameIntersection, Entity::Tab(key), None));
    }
    out
}

/// Clearance between the interior segments of a tab and the frame sides.
pub fn tab_frame_check(key: TabKey, tab: &Tab, cfg: &DrcCfg, frame: &RectangularFrame) -> Option<DrcError> {
    let segs = tab.segments();
    if segs.len() <= 2 {
        return None;
    }
    let d = segs[1..segs.len() - 1]
        .iter()
        .flat_map(|s| frame.sides().iter().map(move |side| s.dist_to_segment(side)))
        .fold(f64::INFINITY, f64::min);
    (d > 0.0 && d < cfg.min_distance)
        .then(|| DrcError::pair(DrcKind::Distance, Entity::Tab(key), Entity::Frame, Some(d)))
}

/// Whether two tabs fall in the pair-check window.
///
/// The division test is `|d1 - d2| mod ndiv`, which does not see neighbours
/// across the seam between the last and the first division.
pub fn in_window(t1: &Tab, t2: &Tab, extents: usize, ndiv: usize) -> bool {
    t1.ring().abs_diff(t2.ring()) <= extents && t1.division().abs_diff(t2.division()) % ndiv.max(1) <= extents
}

/// First matching class among Intersection, Distance and Acute.
pub fn two_tab_check(a: (TabKey, &Tab), b: (TabKey, &Tab), cfg: &DrcCfg, ndiv: usize) -> Option<DrcError> {
    let ((k1, t1), (k2, t2)) = (a, b);
    if t1.is_gap() || t2.is_gap() || !in_window(t1, t2, cfg.extents, ndiv) {
        return None;
    }
    let (e1, e2) = (Entity::Tab(k1), Entity::Tab(k2));
    let dt = t1.dist_to_tab(t2, true);
    if dt == 0.0 {
        return Some(DrcError::pair(DrcKind::Intersection, e1, e2, None));
    }
    if dt < cfg.min_distance && (t1.shape() == TabShape::Jagged || t2.shape() == TabShape::Jagged) {
        return Some(DrcError::pair(DrcKind::Distance, e1, e2, Some(dt)));
    }
    if t1.shares_endpoint_with(t2) && t1.axis() != t2.axis() {
        if let Some(angle) = t1.angle_to_tab(t2) {
            if angle < cfg.min_angle() {
                return Some(DrcError::pair(DrcKind::Acute, e1, e2, Some(angle)));
            }
        }
    }
    None
}

/// Support rule on the border: `b ≤ 2` needs every border tab jagged,
/// `2 < b ≤ 4` needs two, more needs three.
pub fn piece_check(id: PieceId, border: usize, jagged: usize) -> Option<DrcError> {
    let ok = match border {
        0..=2 => jagged == border,
        3..=4 => jagged >= 2,
        _ => jagged >= 3,
    };
    (!ok).then(|| DrcError::single(DrcKind::Unsupported, Entity::Piece(id), None))
}
