//! Data types for tabs and tab synthesis.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// Shape variant of a cut edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TabShape {
    /// No cut; the pieces on both sides merge.
    Gap,
    /// Jittered polyline along the chord.
    Fracture,
    /// Interlocking six-point tab.
    Jagged,
    /// Straight cut between the anchors.
    Line,
}

impl TabShape {
    pub fn name(self) -> &'static str {
        match self {
            TabShape::Gap => "GAP",
            TabShape::Fracture => "FRACTURE",
            TabShape::Jagged => "JAGGED",
            TabShape::Line => "LINE",
        }
    }
}

/// Orientation of an edge in the ring grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Joins two rings at one division.
    Radial,
    /// Runs along one ring between two divisions.
    Angular,
}

impl Axis {
    /// Grid slot holding edges of this axis.
    #[inline]
    pub fn slot(self) -> usize {
        match self {
            Axis::Radial => 0,
            Axis::Angular => 1,
        }
    }

    #[inline]
    pub fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(Axis::Radial),
            1 => Some(Axis::Angular),
            _ => None,
        }
    }
}

/// Grid address of a tab: `(division, column, slot)`.
///
/// `column` is the ring level after cropping; slot 0 of `(i, j)` is the
/// radial edge from ring `j` to ring `j + 1`, slot 1 the angular edge of ring
/// `j` from division `i` to `i + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabKey {
    pub division: usize,
    pub column: usize,
    pub slot: usize,
}

impl TabKey {
    #[inline]
    pub fn new(division: usize, column: usize, slot: usize) -> Self {
        Self {
            division,
            column,
            slot,
        }
    }

    #[inline]
    pub fn axis(&self) -> Option<Axis> {
        Axis::from_slot(self.slot)
    }
}

impl std::fmt::Display for TabKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.division, self.column, self.slot)
    }
}

/// Shape parameters for tab synthesis.
///
/// Fractions are relative to the tab's scaled length; jitters are percents of
/// a nominal length, except `angle_jitter`, which is multiplied by `π`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabCfg {
    /// Jagged tabs whose neck would be shorter than this degrade to `Line`.
    pub min_chord: f64,
    /// Neck (base) width fraction.
    pub bottom_frac: f64,
    /// Head width fraction.
    pub top_frac: f64,
    /// Head depth fraction.
    pub depth: f64,
    pub seg_jitter_pc: f64,
    pub angle_jitter: f64,
    /// Interior points of a fracture; 0 yields a line.
    pub fracture_points: usize,
}

impl Default for TabCfg {
    fn default() -> Self {
        Self {
            min_chord: 2.0,
            bottom_frac: 0.33,
            top_frac: 0.5,
            depth: 0.10,
            seg_jitter_pc: 10.0,
            angle_jitter: 3.0 * PI / 180.0,
            fracture_points: 3,
        }
    }
}

impl TabCfg {
    /// Halved shape fractions and jitters (repair shrink).
    pub fn shrunk(&self) -> Self {
        Self {
            bottom_frac: self.bottom_frac / 2.0,
            top_frac: self.top_frac / 2.0,
            depth: self.depth / 2.0,
            seg_jitter_pc: self.seg_jitter_pc / 2.0,
            angle_jitter: self.angle_jitter / 2.0,
            ..*self
        }
    }

    /// Same shape without randomness (repair de-jitter).
    pub fn dejittered(&self) -> Self {
        Self {
            seg_jitter_pc: 0.0,
            angle_jitter: 0.0,
            ..*self
        }
    }
}

/// Unclipped grid edge handed to [`super::Tab::synthesize`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeDraft {
    pub p1: Point,
    pub p2: Point,
    pub ring: usize,
    pub division: usize,
    pub axis: Axis,
    /// `0.0` means "use the span".
    pub scaled_length: f64,
}

/// Probabilities driving the shape choice of one edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeOdds {
    pub gap: f64,
    pub not_jagged: f64,
    /// Only used when a prototype library is supplied.
    pub prototype: f64,
    /// Innermost-ring edges are never jagged.
    pub allow_jagged: bool,
}
