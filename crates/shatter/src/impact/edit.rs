//! Tab edits addressed by grid key.
//!
//! Each edit drops the DRC errors that reference the edited tab and re-derives
//! the pieces, whose centroids follow their tabs.

use rand::Rng;
use tracing::debug;

use super::Impact;
use crate::drc::DrcKind;
use crate::tab::{TabCfg, TabKey, TabShape};

impl Impact {
    /// Mirror a tab through its chord midpoint. Returns `false` for a missing key.
    pub fn flip_tab(&mut self, key: TabKey) -> bool {
        let Some(tab) = self.grid.get_mut(key) else {
            return false;
        };
        tab.flip();
        self.clear_tab_errors(key);
        self.recompute_pieces();
        true
    }

    /// Remove the cut; the two adjacent pieces merge.
    pub fn make_gap(&mut self, key: TabKey) -> bool {
        let Some(tab) = self.grid.get_mut(key) else {
            return false;
        };
        tab.make_gap();
        self.clear_tab_errors(key);
        self.recompute_pieces();
        true
    }

    pub fn make_jagged<R: Rng + ?Sized>(&mut self, key: TabKey, cfg: &TabCfg, rng: &mut R) -> bool {
        let Some(tab) = self.grid.get_mut(key) else {
            return false;
        };
        tab.make_jagged(cfg, false, rng);
        self.clear_tab_errors(key);
        self.recompute_pieces();
        true
    }

    pub fn make_fracture<R: Rng + ?Sized>(&mut self, key: TabKey, cfg: &TabCfg, rng: &mut R) -> bool {
        let Some(tab) = self.grid.get_mut(key) else {
            return false;
        };
        tab.make_fracture(cfg.fracture_points, cfg.seg_jitter_pc, rng);
        self.clear_tab_errors(key);
        self.recompute_pieces();
        true
    }

    /// Redraw every cutting tab with `cfg`, keeping its variant.
    /// Gaps stay gaps; all DRC errors are dropped.
    pub fn regenerate_tabs<R: Rng + ?Sized>(&mut self, cfg: &TabCfg, rng: &mut R) {
        let mut redrawn = 0usize;
        for key in self.grid.keys() {
            if let Some(tab) = self.grid.get_mut(key) {
                if tab.shape() != TabShape::Gap {
                    tab.remake(cfg, rng);
                    redrawn += 1;
                }
            }
        }
        self.clear_drc();
        self.recompute_pieces();
        debug!(redrawn, "tabs regenerated");
    }

    /// Flip both tabs of every `Intersection` error and drop those errors.
    /// Returns the number of errors handled.
    pub fn flip_intersecting(&mut self) -> usize {
        let (hits, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.errors)
            .into_iter()
            .partition(|e| e.kind == DrcKind::Intersection);
        self.errors = rest;
        for err in &hits {
            for key in err.tab_keys() {
                if let Some(tab) = self.grid.get_mut(key) {
                    tab.flip();
                }
            }
        }
        if !hits.is_empty() {
            self.recompute_pieces();
        }
        hits.len()
    }
}
