//! # Material Replacer
//!
//! Indexes where materials are assigned across a hierarchy of renderable
//! objects and computes replacement results without touching the scene
//! until they are applied.
//!
//! - [`assignment`] - the material → locations index, its path-grouped view,
//!   drift detection and the pure replacement transform
//! - [`provider`] - traits through which the index samples, resolves and
//!   writes back scene state
//! - [`session`] - per-subject and scene-wide replacement workflows
//! - [`world`] - an in-memory scene implementing every provider trait
//! - [`config`] - TOML configuration
//!
//! # Workflow
//!
//! ```
//! use material_replacer::assignment::{AssignmentIndex, ReplacementPlan};
//! use material_replacer::provider::{MaterialApplier, SceneSampler};
//! use material_replacer::world::{MaterialAsset, SceneWorld};
//!
//! let mut world = SceneWorld::new();
//! let old = world.library.add(MaterialAsset::new("old").with_storage_path("Assets/A/old.mat"));
//! let new = world.library.add(MaterialAsset::new("new").with_storage_path("Assets/B/new.mat"));
//! let avatar = world.scene.spawn("avatar", None);
//! world.scene.set_renderer(avatar, vec![Some(old), None]);
//!
//! let index = AssignmentIndex::build(avatar, &world.extract_sample(avatar), &world, "Assets");
//! let plan = ReplacementPlan::for_index(&index).with_replacement(old, Some(new));
//! let result = index.transform(&plan, &world);
//!
//! // Nothing changed in the scene yet.
//! assert!(!index.has_differences(&world.extract_sample(avatar)));
//!
//! world.apply_index(&result);
//! assert_eq!(world.scene.materials(avatar), Some(&[Some(new), None][..]));
//! assert!(index.has_differences(&world.extract_sample(avatar)));
//! ```

pub mod assignment;
pub mod config;
pub mod error;
pub mod path;
pub mod provider;
pub mod session;
pub mod world;

pub use assignment::{AssignmentIndex, Location, MaterialId, ObjectId, ReplacementPlan};
pub use config::ReplacerConfig;
pub use error::{ConfigError, ConfigResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logs the crate version. Call once after installing a logger.
pub fn init() {
    log::info!("Material Replacer v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
