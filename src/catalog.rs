//! In-memory resource catalogs.
//!
//! A [`Catalog`] holds the last-known desired-state metadata for one
//! resource kind, keyed by the client-facing [`ResourceId`].  Entries live
//! for the process lifetime unless explicitly removed; there is no TTL and
//! no garbage collection.

use dashmap::DashMap;

use crate::types::ResourceId;

/// Concurrent keyed store for one resource kind.
///
/// Backed by a [`DashMap`], so individual lookups and mutations are safe
/// under concurrent request handling without an outer lock.  No validation
/// is performed on insert: putting an existing identifier silently
/// overwrites the previous entry.
#[derive(Debug)]
pub struct Catalog<T> {
    entries: DashMap<ResourceId, T>,
}

impl<T: Clone> Catalog<T> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Insert or replace the entry for `id`.
    pub fn put(&self, id: ResourceId, value: T) {
        self.entries.insert(id, value);
    }

    /// Clone out the entry for `id`, if present.
    pub fn get(&self, id: &ResourceId) -> Option<T> {
        self.entries.get(id).map(|entry| entry.clone())
    }

    /// Remove the entry for `id`, returning it if it was present.
    pub fn remove(&self, id: &ResourceId) -> Option<T> {
        self.entries.remove(id).map(|(_, value)| value)
    }

    /// Clone out every entry.  Iteration order is unspecified.
    pub fn list(&self) -> Vec<T> {
        self.entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_remove() {
        let catalog = Catalog::new();
        let id: ResourceId = "res-1".into();

        assert!(catalog.get(&id).is_none());

        catalog.put(id.clone(), 42u32);
        assert_eq!(catalog.get(&id), Some(42));
        assert_eq!(catalog.len(), 1);

        assert_eq!(catalog.remove(&id), Some(42));
        assert!(catalog.get(&id).is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn duplicate_put_overwrites() {
        let catalog = Catalog::new();
        let id: ResourceId = "res-1".into();

        catalog.put(id.clone(), "first".to_owned());
        catalog.put(id.clone(), "second".to_owned());

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&id).as_deref(), Some("second"));
    }

    #[test]
    fn list_returns_all_entries() {
        let catalog = Catalog::new();
        catalog.put("a".into(), 1);
        catalog.put("b".into(), 2);
        catalog.put("c".into(), 3);

        let mut values = catalog.list();
        values.sort();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn remove_missing_is_none() {
        let catalog: Catalog<u32> = Catalog::new();
        assert!(catalog.remove(&"ghost".into()).is_none());
    }
}
