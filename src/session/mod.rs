//! Replacement sessions: indices and plans kept for a set of subjects.
//!
//! - [`ReplacementSession`] - explicitly chosen subjects, each with its own
//!   per-material replacement choices
//! - [`SceneWideReplacement`] - a list of source materials replaced by one
//!   target in every subject of the scene that uses any of them
//!
//! Both follow the same discipline: indices are snapshots, so after any
//! external change the caller polls `refresh_if_drifted` and only then
//! executes. Plans never outlive the index they were built for.

mod per_subject;
mod scene_wide;

pub use per_subject::ReplacementSession;
pub use scene_wide::SceneWideReplacement;

use crate::assignment::{AssignmentIndex, ObjectId, ReplacementPlan};
use crate::provider::{ApplyReport, MaterialApplier, PathResolver, SceneSampler};

/// Index of one subject together with the plan built for it.
#[derive(Debug, Clone)]
pub struct SubjectState {
    index: AssignmentIndex,
    plan: ReplacementPlan,
}

impl SubjectState {
    /// Samples `root` and builds a fresh index with a default plan.
    pub fn build<S>(root: ObjectId, scene: &S, storage_root: &str) -> Self
    where
        S: SceneSampler + PathResolver,
    {
        let index = AssignmentIndex::build(root, &scene.extract_sample(root), scene, storage_root);
        let plan = ReplacementPlan::for_index(&index);
        Self { index, plan }
    }

    /// The snapshot index of the subject.
    pub fn index(&self) -> &AssignmentIndex {
        &self.index
    }

    /// The replacement choices for [`index`](Self::index).
    pub fn plan(&self) -> &ReplacementPlan {
        &self.plan
    }

    /// Mutable access to the replacement choices.
    pub fn plan_mut(&mut self) -> &mut ReplacementPlan {
        &mut self.plan
    }

    /// Returns `true` if the live scene no longer matches the index.
    pub fn is_stale<S: SceneSampler>(&self, scene: &S) -> bool {
        self.index
            .has_differences(&scene.extract_sample(self.index.subject()))
    }

    /// Rebuilds the index from the live scene and carries the replacement
    /// choices, exclusions and `enabled` flag over to the new plan.
    ///
    /// Replacements of materials the subject no longer uses are dropped.
    fn rebased<S>(&self, scene: &S, storage_root: &str) -> Self
    where
        S: SceneSampler + PathResolver,
    {
        let mut state = Self::build(self.index.subject(), scene, storage_root);
        for (material, replacement) in self.plan.active_replacements() {
            if state.index.contains_material(material) {
                state.plan.set_replacement(material, Some(replacement));
            }
        }
        for location in self.plan.excluded() {
            state.plan.set_included(location, false);
        }
        state.plan.set_enabled(self.plan.is_enabled());
        state
    }

    /// Transforms the index with the plan and writes the result back.
    ///
    /// Disabled plans and plans without effective replacements write nothing.
    /// If the scene changed since the index was built, for example because an
    /// overlapping subject was applied earlier in the same batch, the plan is
    /// rebased onto a fresh index first so unrelated slots are not reverted.
    fn execute<S>(&self, scene: &mut S, storage_root: &str) -> ApplyReport
    where
        S: SceneSampler + PathResolver + MaterialApplier,
    {
        if !self.plan.is_enabled() {
            return ApplyReport::default();
        }
        if self.is_stale(&*scene) {
            log::warn!(
                "Subject {:?} changed since it was indexed, rebasing its plan",
                self.index.subject()
            );
            return self.rebased(&*scene, storage_root).apply(scene);
        }
        self.apply(scene)
    }

    fn apply<S>(&self, scene: &mut S) -> ApplyReport
    where
        S: PathResolver + MaterialApplier,
    {
        if !self.plan.has_active_replacements() {
            return ApplyReport::default();
        }
        let result = self.index.transform(&self.plan, &*scene);
        scene.apply_index(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::Location;
    use crate::world::{MaterialAsset, SceneWorld};

    #[test]
    fn subject_state_detects_drift() {
        let mut world = SceneWorld::new();
        let red = world.library.add(MaterialAsset::new("red"));
        let blue = world.library.add(MaterialAsset::new("blue"));
        let root = world.scene.spawn("root", None);
        world.scene.set_renderer(root, vec![Some(red)]);

        let state = SubjectState::build(root, &world, "Assets");
        assert!(!state.is_stale(&world));

        world.scene.set_renderer(root, vec![Some(blue)]);
        assert!(state.is_stale(&world));
    }

    #[test]
    fn disabled_plan_writes_nothing() {
        let mut world = SceneWorld::new();
        let red = world.library.add(MaterialAsset::new("red"));
        let blue = world.library.add(MaterialAsset::new("blue"));
        let root = world.scene.spawn("root", None);
        world.scene.set_renderer(root, vec![Some(red)]);

        let mut state = SubjectState::build(root, &world, "Assets");
        state.plan_mut().set_replacement(red, Some(blue));
        state.plan_mut().set_enabled(false);

        assert_eq!(state.execute(&mut world, "Assets"), ApplyReport::default());
        assert_eq!(world.scene.materials(root), Some(&[Some(red)][..]));
    }

    #[test]
    fn stale_subject_is_rebased_before_applying() {
        let mut world = SceneWorld::new();
        let red = world.library.add(MaterialAsset::new("red"));
        let blue = world.library.add(MaterialAsset::new("blue"));
        let green = world.library.add(MaterialAsset::new("green"));
        let root = world.scene.spawn("root", None);
        world.scene.set_renderer(root, vec![Some(red), Some(blue), Some(blue)]);

        let mut state = SubjectState::build(root, &world, "Assets");
        state.plan_mut().set_replacement(blue, Some(green));
        state.plan_mut().set_included(Location::new(root, 2), false);

        // Changed behind the index's back.
        world.scene.set_renderer(root, vec![Some(green), Some(blue), Some(blue)]);
        assert!(state.is_stale(&world));

        let rebased = state.rebased(&world, "Assets");
        assert!(!rebased.is_stale(&world));
        assert_eq!(rebased.plan().replacement_of(blue), Some(green));
        assert!(!rebased.plan().is_included(&Location::new(root, 2)));

        state.execute(&mut world, "Assets");
        assert_eq!(
            world.scene.materials(root),
            Some(&[Some(green), Some(green), Some(blue)][..])
        );
    }
}
