//! Impact shatter engine: concentric jigsaw cut patterns for fabrication.
//!
//! Pipeline: `ring` builds nested jagged loops around an impact point,
//! `impact` walks the loop grid, clips each edge to the `frame` and asks `tab`
//! for a cut shape, then derives `piece` connectivity by flood fill. `drc`
//! inspects the result and applies local repairs; `doc` persists it.
//!
//! API Policy
//! - The curated surface for callers lives in `api` and `prelude`. Module
//!   paths below are stable enough for tests and benches but may move.

pub mod api;
pub mod doc;
pub mod drc;
pub mod frame;
pub mod geom;
pub mod impact;
pub mod piece;
pub mod projectile;
pub mod ring;
pub mod sampling;
pub mod tab;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Vector type used under `geom::Point`.
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::drc::{DrcCfg, DrcError, DrcKind, Entity, RepairReport};
    pub use crate::frame::RectangularFrame;
    pub use crate::geom::{Point, Polyline, Segment};
    pub use crate::impact::{Impact, ShatterParams};
    pub use crate::piece::{Piece, PieceId};
    pub use crate::projectile::Projectile;
    pub use crate::sampling::ReplayToken;
    pub use crate::tab::{Axis, Tab, TabCfg, TabKey, TabPrototype, TabShape};
}
