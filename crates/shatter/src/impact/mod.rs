//! Impact engine: ring grid assembly, connectivity and edits.
//!
//! Purpose
//! - Turn a frame, an optional projectile silhouette and a parameter set into
//!   a grid of tabs, and derive the pieces those tabs cut the frame into.
//!
//! Why this design
//! - Tabs live in a dense `TabGrid` addressed by `TabKey`; pieces and DRC
//!   errors refer to tabs by key only, so edits never invalidate references.
//! - Connectivity is re-derived from scratch after any edit that can change
//!   a gap flag; the grid is small (divisions × rings × 2).
//!
//! Layout
//! - `build.rs` (generation), `connect.rs` (flood fill), `edit.rs` (tab
//!   edits), `polylines.rs` (export paths), `grid.rs` (storage).
//!
//! Code cross-refs: `ring::JaggedRing`, `tab::Tab::synthesize`, `drc`

mod build;
mod connect;
mod edit;
mod grid;
mod polylines;

pub use build::ring_increments;
pub use connect::extract_pieces;
pub use grid::TabGrid;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drc::DrcError;
use crate::frame::RectangularFrame;
use crate::geom::Point;
use crate::piece::{Piece, PieceId};
use crate::ring::Skew;
use crate::tab::{Tab, TabKey};

/// Generation parameters for one impact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShatterParams {
    /// Impact point `[x, y]`.
    pub center: [f64; 2],
    /// Radius of the first and of the last ring (geometric progression).
    pub impact_radius: [f64; 2],
    /// Smallest increment between consecutive rings after the first.
    pub first_ring_delta: f64,
    pub rings: usize,
    pub divisions: usize,
    /// Radial jitter percent on the first and last ring.
    pub radial_jitter_pc: [f64; 2],
    /// Angular jitter percent on the first and last ring.
    pub angular_jitter_pc: [f64; 2],
    pub min_scale: f64,
    pub max_scale: f64,
    pub skew: Option<Skew>,
    pub p_no_radial: f64,
    pub p_no_ring: f64,
    pub p_not_jagged: f64,
    /// Chance of a library prototype (only with a non-empty library).
    pub p_prototype: f64,
}

impl Default for ShatterParams {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            impact_radius: [20.0, 500.0],
            first_ring_delta: 15.0,
            rings: 10,
            divisions: 24,
            radial_jitter_pc: [20.0, 10.0],
            angular_jitter_pc: [20.0, 10.0],
            min_scale: 0.1,
            max_scale: 5.0,
            skew: None,
            p_no_radial: 0.05,
            p_no_ring: 0.05,
            p_not_jagged: 0.05,
            p_prototype: 0.10,
        }
    }
}

/// Rejected `ShatterParams` field.
#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must lie in [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },
    #[error("min_scale {min} exceeds max_scale {max}")]
    ScaleRange { min: f64, max: f64 },
}

impl ShatterParams {
    #[inline]
    pub fn center_point(&self) -> Point {
        Point::new(self.center[0], self.center[1])
    }

    /// Check the ranges `Impact::generate` relies on.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let lengths = [
            ("impact_radius[0]", self.impact_radius[0]),
            ("impact_radius[1]", self.impact_radius[1]),
            ("first_ring_delta", self.first_ring_delta),
            ("radial_jitter_pc[0]", self.radial_jitter_pc[0]),
            ("radial_jitter_pc[1]", self.radial_jitter_pc[1]),
            ("angular_jitter_pc[0]", self.angular_jitter_pc[0]),
            ("angular_jitter_pc[1]", self.angular_jitter_pc[1]),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
        ];
        if let Some(&(field, value)) = lengths.iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
            return Err(ParamsError::Negative { field, value });
        }
        if self.min_scale > self.max_scale {
            return Err(ParamsError::ScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        let odds = [
            ("p_no_radial", self.p_no_radial),
            ("p_no_ring", self.p_no_ring),
            ("p_not_jagged", self.p_not_jagged),
            ("p_prototype", self.p_prototype),
        ];
        if let Some(&(field, value)) = odds.iter().find(|(_, v)| !(0.0..=1.0).contains(v)) {
            return Err(ParamsError::Probability { field, value });
        }
        Ok(())
    }
}

/// Generated cut pattern: tab grid, derived pieces and the last DRC result.
#[derive(Clone, Debug)]
pub struct Impact {
    ndiv: usize,
    frame: RectangularFrame,
    grid: TabGrid,
    pieces: Vec<Piece>,
    errors: Vec<DrcError>,
}

impl Impact {
    /// Wrap an existing grid (e.g. from a document) and derive its pieces.
    pub fn from_grid(ndiv: usize, frame: RectangularFrame, grid: TabGrid) -> Self {
        let mut impact = Self {
            ndiv: ndiv.max(1),
            frame,
            grid,
            pieces: Vec::new(),
            errors: Vec::new(),
        };
        impact.recompute_pieces();
        impact
    }

    /// Angular division count used for wraparound.
    #[inline]
    pub fn ndiv(&self) -> usize {
        self.ndiv
    }
    #[inline]
    pub fn frame(&self) -> &RectangularFrame {
        &self.frame
    }
    #[inline]
    pub fn grid(&self) -> &TabGrid {
        &self.grid
    }
    #[inline]
    pub fn tab(&self, key: TabKey) -> Option<&Tab> {
        self.grid.get(key)
    }
    /// Present tabs in key order.
    pub fn tabs(&self) -> impl Iterator<Item = (TabKey, &Tab)> + '_ {
        self.grid.iter()
    }
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }
    /// Border tabs of a piece (shared with a neighbour or on the innermost ring).
    pub fn piece_border(&self, id: PieceId) -> Vec<TabKey> {
        self.piece(id)
            .map(|p| p.border(&self.pieces, &self.grid))
            .unwrap_or_default()
    }
    /// Errors of the last DRC pass, minus those cleared by edits.
    #[inline]
    pub fn drc_errors(&self) -> &[DrcError] {
        &self.errors
    }

    pub fn clear_drc(&mut self) {
        self.errors.clear();
    }

    /// Drop every error that references `key`.
    pub fn clear_tab_errors(&mut self, key: TabKey) {
        self.errors.retain(|e| !e.references_tab(key));
    }

    pub(crate) fn set_errors(&mut self, errors: Vec<DrcError>) {
        self.errors = errors;
    }

    pub(crate) fn grid_mut(&mut self) -> &mut TabGrid {
        &mut self.grid
    }
}
