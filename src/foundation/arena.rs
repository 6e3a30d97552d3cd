//! Handle-addressed storage for scopes, bindings and media items.
//!
//! Handles are allocated from a monotonically increasing counter and never reused, so a stale
//! handle simply misses instead of aliasing a newer entry. Iteration follows allocation order,
//! which keeps every refresh cycle deterministic.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// Typed handle that can be minted by an [`Arena`].
pub(crate) trait Handle: Copy + Ord {
    fn from_raw(raw: u64) -> Self;
}

#[derive(Debug)]
pub(crate) struct Arena<K, T> {
    next: u64,
    items: BTreeMap<K, T>,
}

impl<K: Handle, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Handle, T> Arena<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            next: 1,
            items: BTreeMap::new(),
        }
    }

    /// Allocate a handle and store the value built for it.
    pub(crate) fn insert_with(&mut self, build: impl FnOnce(K) -> T) -> K {
        let id = K::from_raw(self.next);
        self.next += 1;
        self.items.insert(id, build(id));
        id
    }

    pub(crate) fn get(&self, id: K) -> Option<&T> {
        self.items.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: K) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: K) -> Option<T> {
        self.items.remove(&id)
    }

    pub(crate) fn contains(&self, id: K) -> bool {
        self.items.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn ids(&self) -> Vec<K> {
        self.items.keys().copied().collect()
    }

    pub(crate) fn iter(&self) -> btree_map::Iter<'_, K, T> {
        self.items.iter()
    }

    pub(crate) fn values(&self) -> btree_map::Values<'_, K, T> {
        self.items.values()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/arena.rs"]
mod tests;
