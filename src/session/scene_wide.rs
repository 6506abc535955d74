//! Replacement of a set of source materials across every subject.

use indexmap::IndexMap;

use super::SubjectState;
use crate::assignment::{MaterialId, ObjectId, ReplacementPlan};
use crate::config::ReplacerConfig;
use crate::provider::{ApplyReport, MaterialApplier, PathResolver, SceneSampler, SubjectSource};

/// Replaces every source material with one target in all subjects that
/// use any of the sources.
///
/// Subjects are discovered through [`SubjectSource`]. Each kept subject gets
/// a plan mapping the sources it uses to the target; its per-location
/// inclusion flags and `enabled` flag can be edited before executing.
#[derive(Debug)]
pub struct SceneWideReplacement {
    config: ReplacerConfig,
    sources: Vec<MaterialId>,
    target: Option<MaterialId>,
    subjects: IndexMap<ObjectId, SubjectState>,
}

impl SceneWideReplacement {
    pub fn new(config: ReplacerConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            target: None,
            subjects: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &ReplacerConfig {
        &self.config
    }

    /// Source materials in the order they were added.
    pub fn sources(&self) -> &[MaterialId] {
        &self.sources
    }

    pub fn target(&self) -> Option<MaterialId> {
        self.target
    }

    /// Adds a source material and rediscovers subjects. Returns `false` if
    /// it was already a source.
    pub fn add_source<S>(&mut self, material: MaterialId, scene: &S) -> bool
    where
        S: SceneSampler + PathResolver + SubjectSource,
    {
        if self.sources.contains(&material) {
            return false;
        }
        self.sources.push(material);
        self.refresh(scene);
        true
    }

    /// Removes a source material and rediscovers subjects. Returns `false`
    /// if it was not a source.
    pub fn remove_source<S>(&mut self, material: MaterialId, scene: &S) -> bool
    where
        S: SceneSampler + PathResolver + SubjectSource,
    {
        let before = self.sources.len();
        self.sources.retain(|&m| m != material);
        if self.sources.len() == before {
            return false;
        }
        self.refresh(scene);
        true
    }

    /// Removes all sources. No subject uses an empty source list.
    pub fn clear_sources(&mut self) {
        self.sources.clear();
        self.subjects.clear();
    }

    /// Sets the target material and updates every plan.
    pub fn set_target(&mut self, target: Option<MaterialId>) {
        self.target = target;
        for state in self.subjects.values_mut() {
            apply_sources(state, &self.sources, target);
        }
    }

    /// Subjects that use at least one source, in discovery order.
    pub fn subjects(&self) -> impl Iterator<Item = &SubjectState> {
        self.subjects.values()
    }

    pub fn subject(&self, root: ObjectId) -> Option<&SubjectState> {
        self.subjects.get(&root)
    }

    pub fn plan_mut(&mut self, root: ObjectId) -> Option<&mut ReplacementPlan> {
        self.subjects.get_mut(&root).map(SubjectState::plan_mut)
    }

    /// Rediscovers subjects and rebuilds every index. All plans are reset.
    pub fn refresh<S>(&mut self, scene: &S)
    where
        S: SceneSampler + PathResolver + SubjectSource,
    {
        let discovered = self.discover(scene);
        self.replace_subjects(discovered);
    }

    /// Refreshes everything if the set of subjects using a source changed,
    /// or if any tracked subject drifted from its index.
    ///
    /// Rediscovery runs on every poll, so a subject that starts using a
    /// source or is newly marked in the scene is picked up too.
    pub fn refresh_if_drifted<S>(&mut self, scene: &S) -> bool
    where
        S: SceneSampler + PathResolver + SubjectSource,
    {
        let discovered = self.discover(scene);
        let drifted = !discovered.keys().eq(self.subjects.keys())
            || self.subjects.values().any(|state| state.is_stale(scene));
        if drifted {
            self.replace_subjects(discovered);
        }
        drifted
    }

    fn discover<S>(&self, scene: &S) -> IndexMap<ObjectId, SubjectState>
    where
        S: SceneSampler + PathResolver + SubjectSource,
    {
        let mut subjects = IndexMap::new();
        for root in scene.subjects(self.config.include_inactive) {
            let mut state = SubjectState::build(root, scene, &self.config.storage_root);
            if !state.index().contains_any(&self.sources) {
                continue;
            }
            apply_sources(&mut state, &self.sources, self.target);
            subjects.insert(root, state);
        }
        subjects
    }

    fn replace_subjects(&mut self, subjects: IndexMap<ObjectId, SubjectState>) {
        self.subjects = subjects;
        log::debug!(
            "Scene-wide replacement: {} source(s) used by {} subject(s)",
            self.sources.len(),
            self.subjects.len()
        );
    }

    /// Replaces the sources with the target in every enabled subject.
    ///
    /// With `swap_after_replace` the target becomes the only source and the
    /// target is cleared, so a follow-up replacement starts from the new
    /// material. Does nothing without a target.
    pub fn execute<S>(&mut self, scene: &mut S) -> ApplyReport
    where
        S: SceneSampler + PathResolver + MaterialApplier + SubjectSource,
    {
        let Some(target) = self.target else {
            log::debug!("Scene-wide replacement has no target, nothing to do");
            return ApplyReport::default();
        };

        let mut report = ApplyReport::default();
        for state in self.subjects.values() {
            report += state.execute(scene, &self.config.storage_root);
        }

        if self.config.swap_after_replace {
            self.sources = vec![target];
            self.target = None;
        }
        self.refresh(scene);
        report
    }
}

fn apply_sources(state: &mut SubjectState, sources: &[MaterialId], target: Option<MaterialId>) {
    let used: Vec<MaterialId> = sources
        .iter()
        .copied()
        .filter(|&m| state.index().contains_material(m))
        .collect();
    state.plan_mut().replace_all(&used, target);
}
