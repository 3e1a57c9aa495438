//! Curated API for callers (the CLI, benches, downstream tools).
//!
//! Important
//! - Prefer these re-exports over deep module paths; internal layout may
//!   change between versions.

// Geometry
pub use crate::frame::RectangularFrame;
pub use crate::geom::{DistanceOffenders, Point, Polyline, Segment};
// Inputs
pub use crate::projectile::Projectile;
pub use crate::ring::{JaggedRing, RingCfg, Skew};
pub use crate::sampling::ReplayToken;
pub use crate::tab::{Axis, Tab, TabCfg, TabKey, TabPrototype, TabShape};
// Engine
pub use crate::impact::{extract_pieces, ring_increments, Impact, ParamsError, ShatterParams, TabGrid};
pub use crate::piece::{Piece, PieceId};
// Checks and repair
pub use crate::drc::{summary as drc_summary, DrcCfg, DrcError, DrcKind, DrcSummary, Entity, RepairReport};
// Documents
pub use crate::doc::{
    impact_from_json, impact_to_json, load_impact, load_projectile, load_prototype, load_tab_library,
    read_impact, read_projectile, read_prototype, save_impact, save_projectile, save_prototype, DocError,
    DOC_VERSION,
};
