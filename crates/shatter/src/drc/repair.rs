//! Heuristic auto-repair driven by the current error list.

use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;
use tracing::info;

use super::{DrcError, DrcKind, Entity};
use crate::impact::Impact;
use crate::sampling::coin;
use crate::tab::{TabCfg, TabKey, TabShape};

/// What one repair pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub deleted: usize,
    pub flipped: usize,
    pub shrunk: usize,
    pub dejittered: usize,
}

impl RepairReport {
    pub fn total(&self) -> usize {
        self.deleted + self.flipped + self.shrunk + self.dejittered
    }
}

/// Tabs scheduled per mitigation; ordered sets keep passes reproducible.
#[derive(Debug, Default)]
struct Plan {
    delete: BTreeSet<TabKey>,
    flip: BTreeSet<TabKey>,
    shrink: BTreeSet<TabKey>,
    dejitter: BTreeSet<TabKey>,
}

impl Impact {
    /// Apply one batch of mitigations for the stored errors.
    ///
    /// Ring-0 tabs are never touched. Touched tabs lose their errors and
    /// connectivity is re-derived. Convergence is not guaranteed; callers
    /// alternate `drc` and `repair`.
    pub fn repair<R: Rng + ?Sized>(&mut self, cfg: &TabCfg, rng: &mut R) -> RepairReport {
        let plan = self.plan_repair(rng);
        let mut report = RepairReport::default();
        let shrunk_cfg = cfg.shrunk();
        let calm_cfg = cfg.dejittered();

        for key in plan.delete {
            if self.repairable(key) && self.make_gap_quiet(key) {
                report.deleted += 1;
            }
        }
        for key in plan.flip {
            if self.repairable(key) && self.flip_quiet(key) {
                report.flipped += 1;
            }
        }
        for key in plan.shrink {
            if !self.repairable(key) {
                continue;
            }
            if let Some(tab) = self.grid_mut().get_mut(key) {
                if tab.shape() == TabShape::Jagged {
                    tab.make_jagged(&shrunk_cfg, false, rng);
                    self.clear_tab_errors(key);
                    report.shrunk += 1;
                }
            }
        }
        for key in plan.dejitter {
            if !self.repairable(key) {
                continue;
            }
            if let Some(tab) = self.grid_mut().get_mut(key) {
                let done = match tab.shape() {
                    TabShape::Jagged => {
                        tab.make_jagged(&calm_cfg, false, rng);
                        true
                    }
                    TabShape::Fracture => {
                        tab.make_fracture(calm_cfg.fracture_points, 0.0, rng);
                        true
                    }
                    TabShape::Gap | TabShape::Line => false,
                };
                if done {
                    self.clear_tab_errors(key);
                    report.dejittered += 1;
                }
            }
        }

        self.recompute_pieces();
        info!(
            deleted = report.deleted,
            flipped = report.flipped,
            shrunk = report.shrunk,
            dejittered = report.dejittered,
            remaining = self.drc_errors().len(),
            "repair"
        );
        report
    }

    fn repairable(&self, key: TabKey) -> bool {
        self.tab(key).is_some_and(|t| t.ring() > 0)
    }

    fn make_gap_quiet(&mut self, key: TabKey) -> bool {
        let Some(tab) = self.grid_mut().get_mut(key) else {
            return false;
        };
        tab.make_gap();
        self.clear_tab_errors(key);
        true
    }

    /// Flip a cutting tab; tabs gapped earlier in the batch stay as they are.
    fn flip_quiet(&mut self, key: TabKey) -> bool {
        let Some(tab) = self.grid_mut().get_mut(key) else {
            return false;
        };
        if tab.is_gap() {
            return false;
        }
        tab.flip();
        self.clear_tab_errors(key);
        true
    }

    fn plan_repair<R: Rng + ?Sized>(&self, rng: &mut R) -> Plan {
        let mut plan = Plan::default();
        let is_fracture = |e: Entity| match e {
            Entity::Tab(k) => self.tab(k).is_some_and(|t| t.shape() == TabShape::Fracture),
            _ => false,
        };
        for err in self.drc_errors() {
            let DrcError { kind, first, second, .. } = *err;
            let Entity::Tab(k1) = first else { continue };
            match (kind, second) {
                (DrcKind::FrameIntersection, _) => {
                    plan.delete.insert(k1);
                }
                (DrcKind::ShortTab | DrcKind::SelfIntersection, _) => {
                    plan.dejitter.insert(k1);
                }
                (DrcKind::Acute, Some(Entity::Tab(k2))) => {
                    let victim = if is_fracture(first) {
                        k1
                    } else if is_fracture(Entity::Tab(k2)) || coin(rng) {
                        k2
                    } else {
                        k1
                    };
                    plan.delete.insert(victim);
                }
                (DrcKind::Intersection | DrcKind::Distance, Some(Entity::Tab(k2))) => {
                    let (flip, shrink) = if is_fracture(first) {
                        (k1, k2)
                    } else if is_fracture(Entity::Tab(k2)) || coin(rng) {
                        (k2, k1)
                    } else {
                        (k1, k2)
                    };
                    plan.flip.insert(flip);
                    plan.shrink.insert(shrink);
                }
                (DrcKind::Intersection | DrcKind::Distance, _) => {
                    plan.delete.insert(k1);
                }
                _ => {}
            }
        }
        plan
    }
}
