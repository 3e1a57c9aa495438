//! Planar primitives for cut-pattern geometry.
//!
//! Purpose
//! - `Point` (dual cartesian/polar), `Segment` (stateless predicates) and
//!   `Polyline` (mergeable cut path) are the vocabulary of every other module.
//!
//! Conventions
//! - Predicates are exact on floats where the generator relies on identity of
//!   shared anchor points (endpoint equality, parallel test); distances are
//!   plain Euclidean.
//! - Angles are radians, counterclockwise, `atan2` range.
//!
//! Code cross-refs: `frame::RectangularFrame`, `tab::Tab`, `ring::JaggedRing`

mod point;
mod polyline;
mod segment;

pub use point::Point;
pub use polyline::{DistanceOffenders, Polyline};
pub use segment::Segment;

#[cfg(test)]
mod tests;
