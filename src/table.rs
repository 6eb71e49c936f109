//! An untyped key-to-value map.
//!
//! A `Table` backs exactly one stored type. It holds its values as `Box<dyn Any>` so the
//! [`DataStore`](crate::DataStore) can keep tables of different types side by side; the typed
//! facade downcasts on the way out. Entries keep their insertion order, so enumerating keys
//! (and therefore bulk removal) is deterministic.

use std::any::Any;

use indexmap::IndexMap;

#[derive(Default)]
pub struct Table {
    entries: IndexMap<String, Box<dyn Any>>,
}

impl Table {
    #[must_use]
    pub fn new() -> Table {
        Table::default()
    }

    /// Inserts `value` under `key`, replacing any existing value. Returns `true` if the key was
    /// not present before.
    pub fn insert(&mut self, key: String, value: Box<dyn Any>) -> bool {
        self.entries.insert(key, value).is_none()
    }

    /// Removes the value stored under `key`. Returns `true` if there was one.
    ///
    /// The remaining entries keep their insertion order, which costs time linear in the number
    /// of entries stored after `key`.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Removes the value stored under `key` in constant time. The last entry moves into the
    /// freed slot, so enumeration order is not preserved.
    pub fn remove_unordered(&mut self, key: &str) -> bool {
        self.entries.swap_remove(key).is_some()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&dyn Any> {
        self.entries.get(key).map(Box::as_ref)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut dyn Any> {
        self.entries.get_mut(key).map(Box::as_mut)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a copy of the keys, safe to iterate while the table is being mutated.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterates the stored values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &dyn Any> {
        self.entries.values().map(Box::as_ref)
    }

    /// Drops every entry. The table stays usable.
    pub fn clear(&mut self) {
        self.entries = IndexMap::new();
    }
}
