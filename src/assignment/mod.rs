//! Material assignment indexing and replacement.
//!
//! - [`ObjectId`] / [`MaterialId`] - identity handles for objects and materials
//! - [`Location`] - one material slot on one object
//! - [`AssignmentIndex`] - material → locations inverse index with path
//!   grouping, drift detection and a pure replacement transform
//! - [`ReplacementPlan`] - per-material replacement choices and per-location
//!   inclusion flags consumed by the transform

mod index;
mod location;
mod plan;

pub use index::{AssignmentIndex, PathGroup};
pub use location::{Location, MaterialId, ObjectId};
pub use plan::ReplacementPlan;
