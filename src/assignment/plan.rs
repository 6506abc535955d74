//! Per-index replacement choices.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::index::AssignmentIndex;
use super::location::{Location, MaterialId};

/// Replacement choices for one [`AssignmentIndex`].
///
/// - per material: an optional replacement (`None` = keep)
/// - per location: an inclusion flag; locations without an entry are included
/// - `enabled`: whether the owning subject takes part in a batch execution
///
/// A plan refers to the locations of one snapshot. It is rebuilt together
/// with its index; only a batch execution that finds its subject stale
/// carries the choices over to a fresh index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementPlan {
    replacements: IndexMap<MaterialId, Option<MaterialId>>,
    included: HashMap<Location, bool>,
    enabled: bool,
}

impl ReplacementPlan {
    /// Creates an enabled plan with no choices.
    pub fn new() -> Self {
        Self {
            replacements: IndexMap::new(),
            included: HashMap::new(),
            enabled: true,
        }
    }

    /// Creates the default plan for `index`: every material kept, every
    /// location included, enabled.
    pub fn for_index(index: &AssignmentIndex) -> Self {
        let mut plan = Self::new();
        for (material, locations) in index.by_material() {
            plan.replacements.insert(material, None);
            plan.included
                .extend(locations.iter().map(|&location| (location, true)));
        }
        plan
    }

    /// Returns this plan with `material` mapped to `replacement`.
    #[must_use]
    pub fn with_replacement(mut self, material: MaterialId, replacement: Option<MaterialId>) -> Self {
        self.set_replacement(material, replacement);
        self
    }

    /// Choose the replacement for `material`. `None` keeps it.
    pub fn set_replacement(&mut self, material: MaterialId, replacement: Option<MaterialId>) {
        self.replacements.insert(material, replacement);
    }

    /// Reset `material` to "keep".
    pub fn clear_replacement(&mut self, material: MaterialId) {
        if let Some(slot) = self.replacements.get_mut(&material) {
            *slot = None;
        }
    }

    /// Map every material in `sources` to `target`.
    pub fn replace_all(&mut self, sources: &[MaterialId], target: Option<MaterialId>) {
        for &source in sources {
            self.set_replacement(source, target);
        }
    }

    /// The chosen replacement for `material`, if any.
    pub fn replacement_of(&self, material: MaterialId) -> Option<MaterialId> {
        self.replacements.get(&material).copied().flatten()
    }

    /// Every material with its choice, in index order.
    pub fn replacements(&self) -> impl Iterator<Item = (MaterialId, Option<MaterialId>)> + '_ {
        self.replacements.iter().map(|(&m, &r)| (m, r))
    }

    /// Choices that actually change something: set, and not the material itself.
    pub fn active_replacements(&self) -> impl Iterator<Item = (MaterialId, MaterialId)> + '_ {
        self.replacements
            .iter()
            .filter_map(|(&material, &replacement)| {
                replacement
                    .filter(|&r| r != material)
                    .map(|r| (material, r))
            })
    }

    /// Returns `true` if executing this plan would change any material.
    pub fn has_active_replacements(&self) -> bool {
        self.active_replacements().next().is_some()
    }

    /// Include or exclude one location.
    pub fn set_included(&mut self, location: Location, included: bool) {
        self.included.insert(location, included);
    }

    /// Whether `location` takes part in replacement. Defaults to `true`.
    pub fn is_included(&self, location: &Location) -> bool {
        self.included.get(location).copied().unwrap_or(true)
    }

    /// Include every location again.
    pub fn include_all(&mut self) {
        self.included.values_mut().for_each(|flag| *flag = true);
    }

    /// Number of explicitly excluded locations.
    pub fn excluded_count(&self) -> usize {
        self.included.values().filter(|&&flag| !flag).count()
    }

    /// Explicitly excluded locations, in no particular order.
    pub fn excluded(&self) -> impl Iterator<Item = Location> + '_ {
        self.included
            .iter()
            .filter(|(_, &flag)| !flag)
            .map(|(&location, _)| location)
    }

    /// Whether the owning subject takes part in a batch execution.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Include or skip the owning subject in a batch execution.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Default for ReplacementPlan {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::ObjectId;
    use crate::provider::RawSample;

    const MESH: ObjectId = ObjectId::new(0, 0);
    const MAT_A: MaterialId = MaterialId(1);
    const MAT_B: MaterialId = MaterialId(2);

    fn index() -> AssignmentIndex {
        let sample = RawSample::from([(MESH, vec![Some(MAT_A), Some(MAT_B), Some(MAT_A)])]);
        AssignmentIndex::build(MESH, &sample, &|_: MaterialId| None::<String>, "Assets")
    }

    #[test]
    fn plan_defaults() {
        let plan = ReplacementPlan::for_index(&index());
        assert!(plan.is_enabled());
        assert_eq!(
            plan.replacements().collect::<Vec<_>>(),
            vec![(MAT_A, None), (MAT_B, None)]
        );
        assert!(plan.is_included(&Location::new(MESH, 2)));
        // Unknown locations are included too.
        assert!(plan.is_included(&Location::new(MESH, 9)));
        assert!(!plan.has_active_replacements());
    }

    #[test]
    fn plan_inclusion_toggles() {
        let mut plan = ReplacementPlan::for_index(&index());
        plan.set_included(Location::new(MESH, 0), false);
        plan.set_included(Location::new(MESH, 2), false);
        assert!(!plan.is_included(&Location::new(MESH, 0)));
        assert_eq!(plan.excluded_count(), 2);
        let mut excluded: Vec<_> = plan.excluded().map(|l| l.slot).collect();
        excluded.sort_unstable();
        assert_eq!(excluded, vec![0, 2]);

        plan.include_all();
        assert_eq!(plan.excluded_count(), 0);
    }

    #[test]
    fn active_replacements_skip_noops() {
        let mut plan = ReplacementPlan::for_index(&index());
        plan.set_replacement(MAT_A, Some(MAT_A));
        assert!(!plan.has_active_replacements());

        plan.set_replacement(MAT_B, Some(MAT_A));
        assert_eq!(
            plan.active_replacements().collect::<Vec<_>>(),
            vec![(MAT_B, MAT_A)]
        );

        plan.clear_replacement(MAT_B);
        assert_eq!(plan.replacement_of(MAT_B), None);
    }

    #[test]
    fn replace_all_sources() {
        let mut plan = ReplacementPlan::new();
        let target = MaterialId(7);
        plan.replace_all(&[MAT_A, MAT_B], Some(target));
        assert_eq!(plan.replacement_of(MAT_A), Some(target));
        assert_eq!(plan.replacement_of(MAT_B), Some(target));
    }
}
