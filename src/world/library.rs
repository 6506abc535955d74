//! Material assets and their storage paths.

use crate::assignment::MaterialId;
use crate::provider::PathResolver;

/// A material asset known to the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialAsset {
    /// Display name.
    pub name: String,
    /// Storage path relative to the project, if the asset is stored on disk.
    /// Built-in and in-memory materials have none.
    pub storage_path: Option<String>,
}

impl MaterialAsset {
    /// Creates an in-memory material with no storage path.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage_path: None,
        }
    }

    /// Set the storage path.
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<String>) -> Self {
        self.storage_path = Some(path.into());
        self
    }
}

/// Append-only store of material assets addressed by [`MaterialId`].
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<MaterialAsset>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a material and returns its handle.
    pub fn add(&mut self, asset: MaterialAsset) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(asset);
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialAsset> {
        self.materials.get(id.0 as usize)
    }

    /// Finds the first material with the given name.
    pub fn find(&self, name: &str) -> Option<MaterialId> {
        self.materials
            .iter()
            .position(|asset| asset.name == name)
            .map(|pos| MaterialId(pos as u32))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl PathResolver for MaterialLibrary {
    fn resolve_storage_path(&self, material: MaterialId) -> Option<String> {
        self.get(material)?.storage_path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_add_and_resolve() {
        let mut library = MaterialLibrary::new();
        let skin = library.add(MaterialAsset::new("skin").with_storage_path("Assets/Body/skin.mat"));
        let builtin = library.add(MaterialAsset::new("default"));

        assert_eq!(library.len(), 2);
        assert_eq!(library.find("default"), Some(builtin));
        assert_eq!(
            library.resolve_storage_path(skin).as_deref(),
            Some("Assets/Body/skin.mat")
        );
        assert!(library.resolve_storage_path(builtin).is_none());
        assert!(library.resolve_storage_path(MaterialId(99)).is_none());
    }
}
