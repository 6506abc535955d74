//! Replacement over explicitly chosen subjects.

use indexmap::IndexMap;

use super::SubjectState;
use crate::assignment::{ObjectId, ReplacementPlan};
use crate::config::ReplacerConfig;
use crate::provider::{ApplyReport, MaterialApplier, PathResolver, SceneSampler};

/// Subjects picked by the user, each with its own replacement plan.
#[derive(Debug)]
pub struct ReplacementSession {
    config: ReplacerConfig,
    subjects: IndexMap<ObjectId, SubjectState>,
}

impl ReplacementSession {
    pub fn new(config: ReplacerConfig) -> Self {
        Self {
            config,
            subjects: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &ReplacerConfig {
        &self.config
    }

    /// Starts tracking `root`. Returns `false` if it is already tracked.
    pub fn add_subject<S>(&mut self, root: ObjectId, scene: &S) -> bool
    where
        S: SceneSampler + PathResolver,
    {
        if self.subjects.contains_key(&root) {
            return false;
        }
        let state = SubjectState::build(root, scene, &self.config.storage_root);
        self.subjects.insert(root, state);
        true
    }

    /// Stops tracking `root`.
    pub fn remove_subject(&mut self, root: ObjectId) -> Option<SubjectState> {
        self.subjects.shift_remove(&root)
    }

    /// Tracked subjects in the order they were added.
    pub fn subjects(&self) -> impl Iterator<Item = &SubjectState> {
        self.subjects.values()
    }

    pub fn subject(&self, root: ObjectId) -> Option<&SubjectState> {
        self.subjects.get(&root)
    }

    pub fn plan_mut(&mut self, root: ObjectId) -> Option<&mut ReplacementPlan> {
        self.subjects.get_mut(&root).map(SubjectState::plan_mut)
    }

    /// Rebuilds every index. All plans are reset.
    pub fn refresh<S>(&mut self, scene: &S)
    where
        S: SceneSampler + PathResolver,
    {
        let storage_root = &self.config.storage_root;
        for (&root, state) in self.subjects.iter_mut() {
            *state = SubjectState::build(root, scene, storage_root);
        }
    }

    /// Rebuilds the subjects whose index no longer matches the scene and
    /// resets their plans. Returns `true` if any subject was rebuilt.
    pub fn refresh_if_drifted<S>(&mut self, scene: &S) -> bool
    where
        S: SceneSampler + PathResolver,
    {
        let storage_root = &self.config.storage_root;
        let mut drifted = false;
        for (&root, state) in self.subjects.iter_mut() {
            if state.is_stale(scene) {
                log::debug!("Subject {root:?} drifted from its index, rebuilding");
                *state = SubjectState::build(root, scene, storage_root);
                drifted = true;
            }
        }
        drifted
    }

    /// Applies every enabled plan, then rebuilds all indices.
    pub fn execute<S>(&mut self, scene: &mut S) -> ApplyReport
    where
        S: SceneSampler + PathResolver + MaterialApplier,
    {
        let mut report = ApplyReport::default();
        for state in self.subjects.values() {
            report += state.execute(scene, &self.config.storage_root);
        }
        self.refresh(scene);
        report
    }
}
