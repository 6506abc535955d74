//! Collaborator traits connecting the assignment index to a live scene.
//!
//! The index itself never touches scene state. Everything it consumes comes
//! through these traits, and everything it produces is written back through
//! [`MaterialApplier`].
//!
//! - [`SceneSampler`] - snapshots material slots under a root object
//! - [`PathResolver`] - resolves a material's storage path for grouping
//! - [`MaterialApplier`] - writes an index's assignments back into slots
//! - [`SubjectSource`] - discovers subject roots for scene-wide replacement

use std::ops::AddAssign;

use indexmap::IndexMap;

use crate::assignment::{AssignmentIndex, MaterialId, ObjectId};

/// Per-object slot arrays sampled from a live scene.
///
/// Keys keep the sampler's enumeration order. `None` marks an empty slot.
pub type RawSample = IndexMap<ObjectId, Vec<Option<MaterialId>>>;

/// Snapshots the material slots of every renderer under a root.
pub trait SceneSampler {
    /// Returns the slot arrays of every renderer in the subtree of `root`,
    /// root included, each in its native slot order.
    ///
    /// Renderers without slots are listed with an empty array. An unknown
    /// root yields an empty sample.
    fn extract_sample(&self, root: ObjectId) -> RawSample;
}

/// Resolves where a material is stored.
///
/// Used only for grouping and sorting. Failures are reported as `None` and
/// never abort index construction.
pub trait PathResolver {
    /// Returns the storage path of `material`, if it has one.
    fn resolve_storage_path(&self, material: MaterialId) -> Option<String>;
}

impl<F> PathResolver for F
where
    F: Fn(MaterialId) -> Option<String>,
{
    fn resolve_storage_path(&self, material: MaterialId) -> Option<String> {
        self(material)
    }
}

/// Writes material assignments back into renderer slots.
pub trait MaterialApplier {
    /// Writes every `(material, location)` pair of `index` into the scene.
    ///
    /// Locations whose object no longer resolves, or whose slot lies outside
    /// the object's current slot array, are skipped.
    fn apply_index(&mut self, index: &AssignmentIndex) -> ApplyReport;
}

/// Discovers subject roots for scene-wide replacement.
pub trait SubjectSource {
    /// Returns every subject root in the scene. Inactive subjects are only
    /// listed when `include_inactive` is set.
    fn subjects(&self, include_inactive: bool) -> Vec<ObjectId>;
}

/// Outcome of writing an index back into a scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Slots that received a material.
    pub written: usize,
    /// Locations skipped because their object or slot no longer exists.
    pub skipped: usize,
}

impl AddAssign for ApplyReport {
    fn add_assign(&mut self, other: Self) {
        self.written += other.written;
        self.skipped += other.skipped;
    }
}
