//! Merge tabs into continuous cut paths for export.

use super::Impact;
use crate::geom::Polyline;
use crate::tab::{Axis, TabKey};

impl Impact {
    /// Continuous cut paths: runs of cutting radial tabs along each division,
    /// then runs of cutting angular tabs along each ring.
    ///
    /// A gap or missing tab ends the current path; a tab that does not share
    /// an end with the current path starts a new one.
    pub fn to_polylines(&self) -> Vec<Polyline> {
        let (rows, cols) = (self.grid.rows(), self.grid.columns());
        let mut out = Vec::new();
        let radial = (0..rows).map(|i| (0..cols).map(move |j| TabKey::new(i, j, Axis::Radial.slot())).collect::<Vec<_>>());
        let angular = (0..cols).map(|j| (0..rows).map(move |i| TabKey::new(i, j, Axis::Angular.slot())).collect::<Vec<_>>());
        for line in radial.chain(angular) {
            let mut current: Option<Polyline> = None;
            for key in line {
                match self.grid.get(key).filter(|t| !t.is_gap()) {
                    None => out.extend(current.take()),
                    Some(tab) => match current.as_mut() {
                        None => current = Some(Polyline::new(tab.points().to_vec())),
                        Some(poly) => {
                            if !poly.add_points(tab.points()) {
                                out.extend(current.replace(Polyline::new(tab.points().to_vec())));
                            }
                        }
                    },
                }
            }
            out.extend(current);
        }
        out
    }
}
