//! Connected puzzle regions found by the flood fill.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::geom::Point;
use crate::impact::TabGrid;
use crate::tab::{Axis, Tab, TabKey};

/// Index of a piece in `Impact::pieces()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PieceId(pub usize);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bounding (non-gap) tabs of one region plus its neighbours.
///
/// Neighbours are ids into the same arena; the relation is kept symmetric by
/// [`link`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Piece {
    tabs: Vec<TabKey>,
    centroid: Point,
    centroid_sum: (f64, f64),
    neighbors: BTreeSet<PieceId>,
}

impl Piece {
    pub fn new(key: TabKey, tab: &Tab) -> Self {
        let mut p = Self::default();
        p.add_tab(key, tab);
        p
    }

    /// Add a bounding tab (ignored if already present).
    pub fn add_tab(&mut self, key: TabKey, tab: &Tab) {
        if self.tabs.contains(&key) {
            return;
        }
        self.tabs.push(key);
        let c = tab.centroid();
        self.centroid_sum.0 += c.x();
        self.centroid_sum.1 += c.y();
        let n = self.tabs.len() as f64;
        self.centroid = Point::new(self.centroid_sum.0 / n, self.centroid_sum.1 / n);
    }

    #[inline]
    pub fn tabs(&self) -> &[TabKey] {
        &self.tabs
    }
    /// Mean of the bounding tabs' centroids.
    #[inline]
    pub fn centroid(&self) -> Point {
        self.centroid
    }
    #[inline]
    pub fn neighbors(&self) -> &BTreeSet<PieceId> {
        &self.neighbors
    }

    /// Tabs shared with a neighbour, plus angular tabs of the innermost ring.
    pub fn border(&self, pieces: &[Piece], grid: &TabGrid) -> Vec<TabKey> {
        self.tabs
            .iter()
            .copied()
            .filter(|key| {
                let innermost = grid
                    .get(*key)
                    .is_some_and(|t| t.axis() == Axis::Angular && t.ring() == 0);
                innermost
                    || self
                        .neighbors
                        .iter()
                        .filter_map(|id| pieces.get(id.0))
                        .any(|n| n.tabs.contains(key))
            })
            .collect()
    }
}

/// Make `a` and `b` neighbours of each other. Self-links are ignored.
pub fn link(pieces: &mut [Piece], a: PieceId, b: PieceId) {
    if a == b || a.0 >= pieces.len() || b.0 >= pieces.len() {
        return;
    }
    pieces[a.0].neighbors.insert(b);
    pieces[b.0].neighbors.insert(a);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab_at(x: f64) -> Tab {
        Tab::new(Point::new(x, 0.0), Point::new(x, 10.0), 1, 0, Axis::Radial, 0.0)
    }

    #[test]
    fn centroid_tracks_tabs_and_ignores_duplicates() {
        let k1 = TabKey::new(0, 0, 0);
        let k2 = TabKey::new(1, 0, 0);
        let mut p = Piece::new(k1, &tab_at(0.0));
        p.add_tab(k2, &tab_at(10.0));
        p.add_tab(k2, &tab_at(10.0));
        assert_eq!(p.tabs().len(), 2);
        assert!((p.centroid().x() - 5.0).abs() < 1e-12);
        assert!((p.centroid().y() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn links_are_symmetric_and_skip_self() {
        let k = TabKey::new(0, 0, 0);
        let mut pieces = vec![Piece::new(k, &tab_at(0.0)), Piece::new(k, &tab_at(1.0))];
        link(&mut pieces, PieceId(0), PieceId(1));
        link(&mut pieces, PieceId(1), PieceId(1));
        assert!(pieces[0].neighbors().contains(&PieceId(1)));
        assert!(pieces[1].neighbors().contains(&PieceId(0)));
        assert!(!pieces[1].neighbors().contains(&PieceId(1)));
    }
}
