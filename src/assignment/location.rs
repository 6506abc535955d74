//! Identity handles and assignment slot locations.

use std::fmt;

/// Generational handle of a renderable object.
///
/// Layout: `u32 index` + `u32 generation`.
///
/// - **index**: slot index in the owning object arena
/// - **generation**: bumped every time the slot is reused, so a handle to a
///   despawned object never resolves to its successor
///
/// Two handles are equal iff both fields match. Handles carry identity only;
/// they never own or borrow the object they point to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    /// Creates a handle from raw parts.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the arena slot index.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Returns the generation of the arena slot this handle was issued for.
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({}v{})", self.index, self.generation)
    }
}

/// Opaque identity handle of a material.
///
/// The index never looks at material content; it only compares handles and
/// asks a [`PathResolver`](crate::provider::PathResolver) where the material
/// is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// One material-assignment slot: an object and an index into its slot array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// The renderable object owning the slot.
    pub object: ObjectId,
    /// Index into the object's material slot array.
    pub slot: usize,
}

impl Location {
    /// Creates a location.
    pub const fn new(object: ObjectId, slot: usize) -> Self {
        Self { object, slot }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}]", self.object, self.slot)
    }
}
