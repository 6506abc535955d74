//! Object hierarchy with renderer material slots.

use crate::assignment::{AssignmentIndex, MaterialId, ObjectId};
use crate::provider::{ApplyReport, MaterialApplier, RawSample, SceneSampler, SubjectSource};

/// Material slots of a renderable object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renderer {
    /// Slot array in native order. `None` marks an empty slot.
    pub materials: Vec<Option<MaterialId>>,
}

impl Renderer {
    pub fn new(materials: Vec<Option<MaterialId>>) -> Self {
        Self { materials }
    }
}

/// An object in a [`RenderScene`].
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Object name.
    pub name: String,
    /// Whether the object itself is active. See
    /// [`RenderScene::is_active_in_hierarchy`] for the effective state.
    pub active: bool,
    /// Whether the object is a subject root for replacement.
    pub subject: bool,
    /// Renderer, if the object draws anything.
    pub renderer: Option<Renderer>,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
}

impl SceneObject {
    fn new(name: String, parent: Option<ObjectId>) -> Self {
        Self {
            name,
            active: true,
            subject: false,
            renderer: None,
            parent,
            children: Vec::new(),
        }
    }

    /// Parent object, `None` for roots.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Direct children in spawn order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}

#[derive(Debug)]
struct ArenaSlot {
    generation: u32,
    object: Option<SceneObject>,
}

/// Generational arena of objects forming a forest.
///
/// Despawning an object frees its slot and bumps the slot generation, so
/// old [`ObjectId`]s stop resolving instead of aliasing the next object
/// spawned there.
#[derive(Debug, Default)]
pub struct RenderScene {
    slots: Vec<ArenaSlot>,
    free: Vec<u32>,
    roots: Vec<ObjectId>,
}

impl RenderScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns an object under `parent`, or as a root when `parent` is `None`
    /// or no longer alive.
    pub fn spawn(&mut self, name: impl Into<String>, parent: Option<ObjectId>) -> ObjectId {
        let parent = match parent {
            Some(p) if self.is_alive(p) => Some(p),
            Some(p) => {
                log::warn!("Spawn parent {p:?} is not alive, spawning as root");
                None
            }
            None => None,
        };

        let object = SceneObject::new(name.into(), parent);
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.object = Some(object);
                ObjectId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(ArenaSlot {
                    generation: 0,
                    object: Some(object),
                });
                ObjectId::new(index, 0)
            }
        };

        match parent.and_then(|p| self.object_mut(p)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Despawns `id` and its whole subtree. Returns `false` if `id` was not
    /// alive.
    pub fn despawn(&mut self, id: ObjectId) -> bool {
        let Some(parent) = self.object(id).map(SceneObject::parent) else {
            return false;
        };
        match parent.and_then(|p| self.object_mut(p)) {
            Some(parent) => parent.children.retain(|&c| c != id),
            None => self.roots.retain(|&r| r != id),
        }

        for victim in self.descendants(id) {
            let slot = &mut self.slots[victim.index() as usize];
            slot.object = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(victim.index());
        }
        true
    }

    /// Returns `true` if `id` refers to a live object.
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.object(id).is_some()
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.object.as_ref())
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.object.as_mut())
    }

    /// Root objects in spawn order.
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// Live objects in arena order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.object
                .as_ref()
                .map(|object| (ObjectId::new(index as u32, slot.generation), object))
        })
    }

    /// Attach a renderer with the given slots. Returns `false` if `id` is not
    /// alive.
    pub fn set_renderer(&mut self, id: ObjectId, materials: Vec<Option<MaterialId>>) -> bool {
        match self.object_mut(id) {
            Some(object) => {
                object.renderer = Some(Renderer::new(materials));
                true
            }
            None => false,
        }
    }

    /// Current slot array of `id`'s renderer.
    pub fn materials(&self, id: ObjectId) -> Option<&[Option<MaterialId>]> {
        self.object(id)?
            .renderer
            .as_ref()
            .map(|renderer| renderer.materials.as_slice())
    }

    pub fn set_active(&mut self, id: ObjectId, active: bool) {
        if let Some(object) = self.object_mut(id) {
            object.active = active;
        }
    }

    /// Mark `id` as a subject root.
    pub fn mark_subject(&mut self, id: ObjectId) {
        if let Some(object) = self.object_mut(id) {
            object.subject = true;
        }
    }

    /// Returns `true` if `id` and all of its ancestors are active.
    pub fn is_active_in_hierarchy(&self, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(cursor) = current {
            match self.object(cursor) {
                Some(object) if object.active => current = object.parent,
                _ => return false,
            }
        }
        true
    }

    /// `root` and every object below it, pre-order, children in spawn order.
    /// Empty if `root` is not alive.
    pub fn descendants(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut result = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(object) = self.object(id) else {
                continue;
            };
            result.push(id);
            stack.extend(object.children.iter().rev().copied());
        }
        result
    }

    fn slot_mut(&mut self, id: ObjectId, slot: usize) -> Option<&mut Option<MaterialId>> {
        self.object_mut(id)?.renderer.as_mut()?.materials.get_mut(slot)
    }
}

impl SceneSampler for RenderScene {
    fn extract_sample(&self, root: ObjectId) -> RawSample {
        self.descendants(root)
            .into_iter()
            .filter_map(|id| {
                let renderer = self.object(id)?.renderer.as_ref()?;
                Some((id, renderer.materials.clone()))
            })
            .collect()
    }
}

impl MaterialApplier for RenderScene {
    fn apply_index(&mut self, index: &AssignmentIndex) -> ApplyReport {
        let mut report = ApplyReport::default();
        for (material, locations) in index.by_material() {
            for location in locations {
                match self.slot_mut(location.object, location.slot) {
                    Some(slot) => {
                        *slot = Some(material);
                        report.written += 1;
                    }
                    None => {
                        log::trace!("Skipping {location}: object or slot no longer exists");
                        report.skipped += 1;
                    }
                }
            }
        }
        log::info!(
            "Applied materials under {:?}: {} written, {} skipped",
            index.subject(),
            report.written,
            report.skipped
        );
        report
    }
}

impl SubjectSource for RenderScene {
    fn subjects(&self, include_inactive: bool) -> Vec<ObjectId> {
        self.objects()
            .filter(|(_, object)| object.subject)
            .map(|(id, _)| id)
            .filter(|&id| include_inactive || self.is_active_in_hierarchy(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: MaterialId = MaterialId(0);
    const BLUE: MaterialId = MaterialId(1);

    #[test]
    fn spawn_builds_hierarchy() {
        let mut scene = RenderScene::new();
        let root = scene.spawn("avatar", None);
        let body = scene.spawn("body", Some(root));
        let hair = scene.spawn("hair", Some(root));
        let tip = scene.spawn("tip", Some(hair));

        assert_eq!(scene.roots(), &[root]);
        assert_eq!(scene.object(root).unwrap().children(), &[body, hair]);
        assert_eq!(scene.object(tip).unwrap().parent(), Some(hair));
        assert_eq!(scene.descendants(root), vec![root, body, hair, tip]);
    }

    #[test]
    fn spawn_under_dead_parent_becomes_root() {
        let mut scene = RenderScene::new();
        let gone = scene.spawn("gone", None);
        scene.despawn(gone);
        let orphan = scene.spawn("orphan", Some(gone));
        assert_eq!(scene.roots(), &[orphan]);
    }

    #[test]
    fn despawn_invalidates_handles() {
        let mut scene = RenderScene::new();
        let root = scene.spawn("root", None);
        let child = scene.spawn("child", Some(root));

        assert!(scene.despawn(root));
        assert!(!scene.is_alive(root));
        assert!(!scene.is_alive(child));
        assert!(!scene.despawn(root));
        assert!(scene.roots().is_empty());

        // Reused slot gets a new generation.
        let fresh = scene.spawn("fresh", None);
        assert_eq!(fresh, ObjectId::new(child.index(), 1));
        assert!(!scene.is_alive(child));
    }

    #[test]
    fn despawn_child_detaches_from_parent() {
        let mut scene = RenderScene::new();
        let root = scene.spawn("root", None);
        let child = scene.spawn("child", Some(root));
        scene.despawn(child);
        assert!(scene.object(root).unwrap().children().is_empty());
    }

    #[test]
    fn active_in_hierarchy() {
        let mut scene = RenderScene::new();
        let root = scene.spawn("root", None);
        let child = scene.spawn("child", Some(root));
        assert!(scene.is_active_in_hierarchy(child));
        scene.set_active(root, false);
        assert!(!scene.is_active_in_hierarchy(child));
    }

    #[test]
    fn sample_lists_renderers_in_subtree() {
        let mut scene = RenderScene::new();
        let root = scene.spawn("root", None);
        let bare = scene.spawn("bare", Some(root));
        let mesh = scene.spawn("mesh", Some(root));
        let empty = scene.spawn("empty", Some(bare));
        let other = scene.spawn("other", None);
        scene.set_renderer(mesh, vec![Some(RED), None]);
        scene.set_renderer(empty, vec![]);
        scene.set_renderer(other, vec![Some(BLUE)]);

        let sample = scene.extract_sample(root);
        let objects: Vec<_> = sample.keys().copied().collect();
        assert_eq!(objects, vec![empty, mesh]);
        assert_eq!(sample[&mesh], vec![Some(RED), None]);
        assert!(sample[&empty].is_empty());
        assert!(scene.extract_sample(ObjectId::new(42, 0)).is_empty());
    }

    #[test]
    fn subjects_filter_inactive() {
        let mut scene = RenderScene::new();
        let a = scene.spawn("a", None);
        let b = scene.spawn("b", None);
        scene.spawn("prop", None);
        scene.mark_subject(a);
        scene.mark_subject(b);
        scene.set_active(b, false);

        assert_eq!(scene.subjects(true), vec![a, b]);
        assert_eq!(scene.subjects(false), vec![a]);
    }
}
