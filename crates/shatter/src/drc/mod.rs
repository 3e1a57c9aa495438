//! Design-rule checking and heuristic repair.
//!
//! Purpose
//! - Flag geometric conditions that make a cut pattern unmanufacturable or
//!   produce pieces that fall apart, and apply local mitigations.
//!
//! Why this design
//! - Errors reference tabs and pieces by key (`Entity`), never by pointer, so
//!   the grid can be edited while a report is held.
//! - Tab-pair checks only run inside an index window (`DrcCfg::extents`);
//!   tabs far apart in ring/division space are assumed far apart in the plane.
//! - Repair is one batch per call. Callers alternate `Impact::drc` and
//!   `Impact::repair` until the report is clean or they give up.
//!
//! Layout
//! - `types.rs` (config, error records, summary), `check.rs` (rules),
//!   `repair.rs` (mitigations).
//!
//! Code cross-refs: `impact::Impact`, `tab::Tab::{dist_to_tab,angle_to_tab}`,
//! `piece::Piece::border`.

mod check;
mod repair;
mod types;

pub use check::{in_window, piece_check, single_tab_check, tab_frame_check, two_tab_check};
pub use repair::RepairReport;
pub use types::{summary, DrcCfg, DrcError, DrcKind, DrcSummary, Entity};
