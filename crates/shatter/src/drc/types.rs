//! DRC configuration, error records and summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::PieceId;
use crate::tab::TabKey;

/// Thresholds for one DRC pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrcCfg {
    /// Minimum clearance between cuts.
    pub min_distance: f64,
    /// Minimum chord of a tab that touches the frame border.
    pub min_tab_length: f64,
    /// Minimum angle between tabs meeting at a vertex, in degrees.
    pub min_angle_deg: f64,
    /// Index window (rings and divisions) for tab-pair checks.
    pub extents: usize,
}

impl Default for DrcCfg {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            min_tab_length: 6.0,
            min_angle_deg: 20.0,
            extents: 2,
        }
    }
}

impl DrcCfg {
    #[inline]
    pub fn min_angle(&self) -> f64 {
        self.min_angle_deg.to_radians()
    }
}

/// Error classes, in report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DrcKind {
    ShortTab,
    SelfIntersection,
    Intersection,
    FrameIntersection,
    Distance,
    Acute,
    Unsupported,
}

impl DrcKind {
    pub const ALL: [DrcKind; 7] = [
        DrcKind::ShortTab,
        DrcKind::SelfIntersection,
        DrcKind::Intersection,
        DrcKind::FrameIntersection,
        DrcKind::Distance,
        DrcKind::Acute,
        DrcKind::Unsupported,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DrcKind::ShortTab => "Short tabs on edge",
            DrcKind::SelfIntersection => "Self-intersections",
            DrcKind::Intersection => "Tab-tab intersections",
            DrcKind::FrameIntersection => "Frame intersections",
            DrcKind::Distance => "Small distance",
            DrcKind::Acute => "Acute angle",
            DrcKind::Unsupported => "Unsupported pieces",
        }
    }
}

/// Thing an error points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Tab(TabKey),
    Frame,
    Piece(PieceId),
}

/// One DRC finding.
///
/// `value` carries the measured distance (`Distance`), the angle in radians
/// (`Acute`) or the chord length (`ShortTab`). Equality ignores `value` and
/// is symmetric in the two entities.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DrcError {
    pub kind: DrcKind,
    pub first: Entity,
    pub second: Option<Entity>,
    pub value: Option<f64>,
}

impl DrcError {
    pub fn single(kind: DrcKind, first: Entity, value: Option<f64>) -> Self {
        Self {
            kind,
            first,
            second: None,
            value,
        }
    }

    pub fn pair(kind: DrcKind, first: Entity, second: Entity, value: Option<f64>) -> Self {
        Self {
            kind,
            first,
            second: Some(second),
            value,
        }
    }

    /// Tab keys referenced by this error (zero to two).
    pub fn tab_keys(&self) -> Vec<TabKey> {
        [Some(self.first), self.second]
            .into_iter()
            .flatten()
            .filter_map(|e| match e {
                Entity::Tab(k) => Some(k),
                _ => None,
            })
            .collect()
    }

    pub fn references_tab(&self, key: TabKey) -> bool {
        self.first == Entity::Tab(key) || self.second == Some(Entity::Tab(key))
    }
}

impl PartialEq for DrcError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && ((self.first == other.first && self.second == other.second)
                || (Some(self.first) == other.second && self.second == Some(other.first)))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Tab(k) => write!(f, "tab {k}"),
            Entity::Frame => write!(f, "frame"),
            Entity::Piece(id) => write!(f, "piece {id}"),
        }
    }
}

impl fmt::Display for DrcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.first)?;
        if let Some(s) = self.second {
            write!(f, " / {s}")?;
        }
        match (self.kind, self.value) {
            (DrcKind::Acute, Some(v)) => write!(f, " ({:.1}deg)", v.to_degrees()),
            (_, Some(v)) => write!(f, " ({v:.1})"),
            _ => Ok(()),
        }
    }
}

/// Per-kind error counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DrcSummary {
    pub short_tab: usize,
    pub self_intersection: usize,
    pub intersection: usize,
    pub frame_intersection: usize,
    pub distance: usize,
    pub acute: usize,
    pub unsupported: usize,
    pub total: usize,
}

impl DrcSummary {
    pub fn count(&self, kind: DrcKind) -> usize {
        match kind {
            DrcKind::ShortTab => self.short_tab,
            DrcKind::SelfIntersection => self.self_intersection,
            DrcKind::Intersection => self.intersection,
            DrcKind::FrameIntersection => self.frame_intersection,
            DrcKind::Distance => self.distance,
            DrcKind::Acute => self.acute,
            DrcKind::Unsupported => self.unsupported,
        }
    }
}

/// Count errors per kind.
pub fn summary(errors: &[DrcError]) -> DrcSummary {
    let mut s = DrcSummary {
        total: errors.len(),
        ..DrcSummary::default()
    };
    for e in errors {
        let slot = match e.kind {
            DrcKind::ShortTab => &mut s.short_tab,
            DrcKind::SelfIntersection => &mut s.self_intersection,
            DrcKind::Intersection => &mut s.intersection,
            DrcKind::FrameIntersection => &mut s.frame_intersection,
            DrcKind::Distance => &mut s.distance,
            DrcKind::Acute => &mut s.acute,
            DrcKind::Unsupported => &mut s.unsupported,
        };
        *slot += 1;
    }
    s
}

impl fmt::Display for DrcSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in DrcKind::ALL {
            writeln!(f, "{}: {}", kind.label(), self.count(kind))?;
        }
        write!(f, "Total errors: {}", self.total)
    }
}
