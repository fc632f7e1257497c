//! Registration storage.
//!
//! [`Registry`] maps keys to [`RegistrationEntry`] values. Keys are unique
//! and iterate in insertion order; a replaced key keeps its position. The
//! iteration order is what breaks ties in fuzzy name matching and controller
//! pattern selection.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::entry::RegistrationEntry;
use crate::key::RegistryKey;

/// Key to entry storage owned by one manager.
#[derive(Debug)]
pub struct Registry<K> {
    entries: IndexMap<K, RegistrationEntry, FxBuildHasher>,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self {
            entries: IndexMap::default(),
        }
    }
}

impl<K: RegistryKey> Registry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry for `key`.
    pub fn get(&self, key: &K) -> Option<&RegistrationEntry> {
        self.entries.get(key)
    }

    /// Check if `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Store an entry, returning the one it replaced.
    pub(crate) fn insert(&mut self, key: K, entry: RegistrationEntry) -> Option<RegistrationEntry> {
        self.entries.insert(key, entry)
    }

    /// Remove an entry, preserving the order of the rest.
    pub(crate) fn remove(&mut self, key: &K) -> Option<RegistrationEntry> {
        self.entries.shift_remove(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &RegistrationEntry)> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
