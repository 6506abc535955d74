//! The material → locations inverse index.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use super::location::{Location, MaterialId, ObjectId};
use super::plan::ReplacementPlan;
use crate::path;
use crate::provider::{PathResolver, RawSample};

/// Inverse index of where materials are assigned under one subject.
///
/// Built from a [`RawSample`] snapshot. Holds two views of the same data:
///
/// - **by material** - each material with its locations, materials in first
///   encounter order and locations in sample order
/// - **path groups** - materials grouped by the directory they are stored in
///   (see [`path::group_key`]), groups ordered by key, materials within a
///   group ordered by full storage path
///
/// The index is immutable. [`transform`](Self::transform) produces a new
/// index and never touches the receiver.
///
/// # Example
///
/// ```
/// use indexmap::IndexMap;
/// use material_replacer::assignment::{AssignmentIndex, Location, MaterialId, ObjectId};
///
/// let mesh = ObjectId::new(0, 0);
/// let (red, blue) = (MaterialId(1), MaterialId(2));
/// let sample = IndexMap::from([(mesh, vec![Some(red), None, Some(blue), Some(red)])]);
///
/// let index = AssignmentIndex::build(mesh, &sample, &|_: MaterialId| None::<String>, "Assets");
/// assert_eq!(
///     index.locations_of(red),
///     &[Location::new(mesh, 0), Location::new(mesh, 3)]
/// );
/// assert_eq!(index.location_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentIndex {
    subject: ObjectId,
    storage_root: String,
    by_material: IndexMap<MaterialId, Vec<Location>>,
    paths: HashMap<MaterialId, Option<String>>,
    groups: BTreeMap<String, Vec<MaterialId>>,
    /// Sampled slot array length of every object, empty ones included.
    slot_counts: HashMap<ObjectId, usize>,
}

impl AssignmentIndex {
    /// Creates an index with no assignments.
    pub fn empty(subject: ObjectId, storage_root: impl Into<String>) -> Self {
        Self {
            subject,
            storage_root: storage_root.into(),
            by_material: IndexMap::new(),
            paths: HashMap::new(),
            groups: BTreeMap::new(),
            slot_counts: HashMap::new(),
        }
    }

    /// Builds the index for `subject` from a sampled slot layout.
    ///
    /// Empty slots contribute nothing. Storage paths are resolved once per
    /// distinct material and grouped relative to `storage_root`.
    pub fn build(
        subject: ObjectId,
        sample: &RawSample,
        resolver: &dyn PathResolver,
        storage_root: &str,
    ) -> Self {
        let assignments = sample.iter().flat_map(|(&object, slots)| {
            slots.iter().enumerate().filter_map(move |(slot, material)| {
                material.map(|material| (Location::new(object, slot), material))
            })
        });
        let slot_counts = sample
            .iter()
            .map(|(&object, slots)| (object, slots.len()))
            .collect();
        Self::from_assignments(
            subject,
            storage_root.to_string(),
            assignments,
            slot_counts,
            resolver,
        )
    }

    fn from_assignments(
        subject: ObjectId,
        storage_root: String,
        assignments: impl IntoIterator<Item = (Location, MaterialId)>,
        slot_counts: HashMap<ObjectId, usize>,
        resolver: &dyn PathResolver,
    ) -> Self {
        let mut by_material: IndexMap<MaterialId, Vec<Location>> = IndexMap::new();
        for (location, material) in assignments {
            by_material.entry(material).or_default().push(location);
        }

        let paths: HashMap<MaterialId, Option<String>> = by_material
            .keys()
            .map(|&material| (material, resolver.resolve_storage_path(material)))
            .collect();
        let path_of = |material: &MaterialId| paths.get(material).and_then(|p| p.as_deref());

        let mut groups: BTreeMap<String, Vec<MaterialId>> = BTreeMap::new();
        for material in by_material.keys() {
            let key = path::group_key(path_of(material), &storage_root);
            groups.entry(key).or_default().push(*material);
        }
        // Stable sort: equal paths keep encounter order.
        for materials in groups.values_mut() {
            materials.sort_by(|a, b| path::compare_paths(path_of(a), path_of(b)));
        }

        log::debug!(
            "Indexed subject {:?}: {} materials, {} path groups",
            subject,
            by_material.len(),
            groups.len()
        );

        Self {
            subject,
            storage_root,
            by_material,
            paths,
            groups,
            slot_counts,
        }
    }

    /// The root object this index was built for.
    pub fn subject(&self) -> ObjectId {
        self.subject
    }

    /// The storage root stripped from group keys.
    pub fn storage_root(&self) -> &str {
        &self.storage_root
    }

    /// Returns `true` if no slot under the subject holds a material.
    pub fn is_empty(&self) -> bool {
        self.by_material.is_empty()
    }

    /// Number of distinct materials.
    pub fn material_count(&self) -> usize {
        self.by_material.len()
    }

    /// Number of assigned slots across all materials.
    pub fn location_count(&self) -> usize {
        self.by_material.values().map(Vec::len).sum()
    }

    /// Distinct materials in first encounter order.
    pub fn materials(&self) -> impl Iterator<Item = MaterialId> + '_ {
        self.by_material.keys().copied()
    }

    /// Each material with its locations, in first encounter order.
    pub fn by_material(&self) -> impl Iterator<Item = (MaterialId, &[Location])> + '_ {
        self.by_material
            .iter()
            .map(|(&material, locations)| (material, locations.as_slice()))
    }

    /// Locations of `material`; empty if the material is not assigned.
    pub fn locations_of(&self, material: MaterialId) -> &[Location] {
        self.by_material
            .get(&material)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns `true` if `material` is assigned to at least one slot.
    pub fn contains_material(&self, material: MaterialId) -> bool {
        self.by_material.contains_key(&material)
    }

    /// Returns `true` if any of `materials` is assigned.
    pub fn contains_any(&self, materials: &[MaterialId]) -> bool {
        materials.iter().any(|&m| self.contains_material(m))
    }

    /// The material assigned at `location`, if the index holds it.
    pub fn material_at(&self, location: &Location) -> Option<MaterialId> {
        self.by_material
            .iter()
            .find(|(_, locations)| locations.contains(location))
            .map(|(&material, _)| material)
    }

    /// The storage path resolved for `material` at build time.
    pub fn storage_path(&self, material: MaterialId) -> Option<&str> {
        self.paths.get(&material).and_then(|p| p.as_deref())
    }

    /// Path groups in ordinal key order.
    pub fn path_groups(&self) -> impl Iterator<Item = PathGroup<'_>> + '_ {
        self.groups.iter().map(move |(key, materials)| PathGroup {
            key: key.as_str(),
            materials: materials.as_slice(),
            index: self,
        })
    }

    /// Rebuilds each object's material list, ordered by slot.
    ///
    /// Empty slots are dropped, so the result equals the sample this index
    /// was built from with every `None` filtered out and every object
    /// without materials omitted. Objects appear in first encounter order of
    /// the by-material view.
    pub fn reconstruct(&self) -> IndexMap<ObjectId, Vec<MaterialId>> {
        let mut objects: IndexMap<ObjectId, Vec<(usize, MaterialId)>> = IndexMap::new();
        for (&material, locations) in &self.by_material {
            for location in locations {
                objects
                    .entry(location.object)
                    .or_default()
                    .push((location.slot, material));
            }
        }
        objects
            .into_iter()
            .map(|(object, mut slots)| {
                slots.sort_by_key(|&(slot, _)| slot);
                (object, slots.into_iter().map(|(_, m)| m).collect())
            })
            .collect()
    }

    /// Each object's slot array as held by the index, gaps left empty.
    fn slot_layouts(&self) -> HashMap<ObjectId, Vec<Option<MaterialId>>> {
        let mut layouts: HashMap<ObjectId, Vec<Option<MaterialId>>> = HashMap::new();
        for (&material, locations) in &self.by_material {
            for location in locations {
                let slots = layouts.entry(location.object).or_default();
                if slots.len() <= location.slot {
                    slots.resize(location.slot + 1, None);
                }
                slots[location.slot] = Some(material);
            }
        }
        layouts
    }

    /// Returns `true` if `sample` no longer matches the snapshot this index
    /// holds.
    ///
    /// True if the object set differs, or any object's slot array differs in
    /// length or in the material at some position. Objects whose slots are
    /// all empty still count, since their sampled length is recorded.
    pub fn has_differences(&self, sample: &RawSample) -> bool {
        if sample.len() != self.slot_counts.len() {
            return true;
        }
        let layouts = self.slot_layouts();

        sample.iter().any(|(object, slots)| {
            if self.slot_counts.get(object) != Some(&slots.len()) {
                return true;
            }
            // The indexed layout ends at its last assigned slot.
            let indexed = layouts.get(object).map(Vec::as_slice).unwrap_or(&[]);
            slots
                .iter()
                .enumerate()
                .any(|(slot, material)| indexed.get(slot).copied().flatten() != *material)
        })
    }

    /// Produces the index that results from applying `plan`.
    ///
    /// See [`transform_with`](Self::transform_with).
    pub fn transform(&self, plan: &ReplacementPlan, resolver: &dyn PathResolver) -> Self {
        self.transform_with(
            |material| plan.replacement_of(material),
            |location| plan.is_included(location),
            resolver,
        )
    }

    /// Produces a new index where each location's material is replaced.
    ///
    /// A location moves to `replacement_of(material)` only if the
    /// replacement exists and `included(location)` holds; otherwise it keeps
    /// its original material. The result is grouped exactly like a freshly
    /// built index.
    pub fn transform_with(
        &self,
        replacement_of: impl Fn(MaterialId) -> Option<MaterialId>,
        included: impl Fn(&Location) -> bool,
        resolver: &dyn PathResolver,
    ) -> Self {
        let mut reassigned = 0usize;
        let mut assignments = Vec::with_capacity(self.location_count());

        for (&material, locations) in &self.by_material {
            let replacement = replacement_of(material).filter(|&r| r != material);
            for location in locations {
                let result = match replacement {
                    Some(replacement) if included(location) => {
                        reassigned += 1;
                        replacement
                    }
                    _ => material,
                };
                assignments.push((*location, result));
            }
        }

        log::debug!(
            "Transforming subject {:?}: {} of {} locations reassigned",
            self.subject,
            reassigned,
            assignments.len()
        );

        Self::from_assignments(
            self.subject,
            self.storage_root.clone(),
            assignments,
            self.slot_counts.clone(),
            resolver,
        )
    }
}

/// Content equality: the subject handle and the sampled slot lengths are
/// not compared.
impl PartialEq for AssignmentIndex {
    fn eq(&self, other: &Self) -> bool {
        self.by_material == other.by_material && self.groups == other.groups
    }
}

impl Eq for AssignmentIndex {}

/// One storage directory and the materials stored in it.
#[derive(Debug, Clone, Copy)]
pub struct PathGroup<'a> {
    key: &'a str,
    materials: &'a [MaterialId],
    index: &'a AssignmentIndex,
}

impl<'a> PathGroup<'a> {
    /// Normalized directory key.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// Number of materials in the group.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns `true` if the group holds no materials.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Materials with their locations, ordered by full storage path.
    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &'a [Location])> + 'a {
        let index = self.index;
        self.materials
            .iter()
            .map(move |&material| (material, index.locations_of(material)))
    }
}
