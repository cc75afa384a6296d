//=========================================================================
// Resource Holder
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{ResourceError, ResourceId};

//=== Resource Trait ======================================================

/// A resource type that can be loaded from a file.
pub trait Resource: Sized {
    /// Loads the resource stored at `path`, registered under `id`.
    fn load_from_file(id: ResourceId, path: &Path) -> Result<Self, ResourceError>;
}

//=== ResourceHolder ======================================================

/// Id-keyed cache of loaded resources of one kind.
#[derive(Debug)]
pub struct ResourceHolder<R> {
    resources: HashMap<ResourceId, R>,
}

impl<R> ResourceHolder<R> {
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
        }
    }

    /// Stores an already-built resource under `id`.
    ///
    /// Replaces (and returns) any resource previously stored under `id`.
    pub fn insert(&mut self, id: ResourceId, resource: R) -> Option<R> {
        let previous = self.resources.insert(id, resource);
        if previous.is_some() {
            warn!(target: "resources", "Resource {} was already loaded and has been replaced", id);
        }
        previous
    }

    /// Returns the resource stored under `id`.
    pub fn get(&self, id: ResourceId) -> Result<&R, ResourceError> {
        self.resources.get(&id).ok_or(ResourceError::NotLoaded(id))
    }

    pub fn get_mut(&mut self, id: ResourceId) -> Result<&mut R, ResourceError> {
        self.resources.get_mut(&id).ok_or(ResourceError::NotLoaded(id))
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.resources.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<R: Resource> ResourceHolder<R> {
    /// Loads the resource at `path` and stores it under `id`.
    pub fn load(&mut self, id: ResourceId, path: impl AsRef<Path>) -> Result<(), ResourceError> {
        let path = path.as_ref();
        let resource = R::load_from_file(id, path)?;
        debug!(target: "resources", "Loaded {} from {}", id, path.display());
        self.insert(id, resource);
        Ok(())
    }
}

impl<R> Default for ResourceHolder<R> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: ResourceId = ResourceId::new("first");
    const MISSING: ResourceId = ResourceId::new("missing");

    #[test]
    fn get_returns_inserted_resource() {
        let mut holder = ResourceHolder::new();
        holder.insert(FIRST, 7_u32);

        assert_eq!(*holder.get(FIRST).unwrap(), 7);
        assert!(holder.contains(FIRST));
        assert_eq!(holder.len(), 1);
    }

    #[test]
    fn get_unknown_id_is_not_loaded_error() {
        let holder: ResourceHolder<u32> = ResourceHolder::new();

        match holder.get(MISSING) {
            Err(ResourceError::NotLoaded(id)) => assert_eq!(id, MISSING),
            other => panic!("Expected NotLoaded, got {:?}", other),
        }
    }

    #[test]
    fn insert_twice_replaces_and_returns_previous() {
        let mut holder = ResourceHolder::new();
        assert!(holder.insert(FIRST, 1_u32).is_none());
        assert_eq!(holder.insert(FIRST, 2_u32), Some(1));
        assert_eq!(*holder.get(FIRST).unwrap(), 2);
        assert_eq!(holder.len(), 1);
    }

    #[test]
    fn get_mut_allows_in_place_edits() {
        let mut holder = ResourceHolder::new();
        holder.insert(FIRST, 1_u32);
        *holder.get_mut(FIRST).unwrap() += 41;
        assert_eq!(*holder.get(FIRST).unwrap(), 42);
    }
}
