//! In-memory scene implementing every collaborator trait.
//!
//! - [`RenderScene`] - generational arena of objects with renderer slots
//! - [`MaterialLibrary`] / [`MaterialAsset`] - material assets and storage paths
//! - [`SceneWorld`] - both together, usable wherever a session needs a
//!   sampler, resolver, applier and subject source at once

mod library;
mod scene;

pub use library::{MaterialAsset, MaterialLibrary};
pub use scene::{RenderScene, Renderer, SceneObject};

use crate::assignment::{AssignmentIndex, MaterialId, ObjectId};
use crate::provider::{
    ApplyReport, MaterialApplier, PathResolver, RawSample, SceneSampler, SubjectSource,
};

/// A [`RenderScene`] and the [`MaterialLibrary`] its slots refer to.
#[derive(Debug, Default)]
pub struct SceneWorld {
    pub scene: RenderScene,
    pub library: MaterialLibrary,
}

impl SceneWorld {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneSampler for SceneWorld {
    fn extract_sample(&self, root: ObjectId) -> RawSample {
        self.scene.extract_sample(root)
    }
}

impl PathResolver for SceneWorld {
    fn resolve_storage_path(&self, material: MaterialId) -> Option<String> {
        self.library.resolve_storage_path(material)
    }
}

impl MaterialApplier for SceneWorld {
    fn apply_index(&mut self, index: &AssignmentIndex) -> ApplyReport {
        self.scene.apply_index(index)
    }
}

impl SubjectSource for SceneWorld {
    fn subjects(&self, include_inactive: bool) -> Vec<ObjectId> {
        self.scene.subjects(include_inactive)
    }
}
