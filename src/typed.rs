//! The typed facade over one type's table.
//!
//! [`Typed<T>`] is obtained from [`DataStore::typed`] and gives type-safe access to the table
//! that stores `T`, together with the observers attached to it:
//!
//! - *update* observers fire on every `add`/`update` with the value and whether its key was new,
//! - *per-key* observers fire on `add`/`update` of one particular key,
//! - *delete* observers fire on `remove`, before the value leaves the table.
//!
//! Observers receive `&mut DataStore`, so they can read or mutate the store (this type or any
//! other) from inside the callback. Dispatch is synchronous and nothing guards against an
//! observer that recurses into itself.
//!
//! ```
//! use datastore::{impl_entry, DataStore};
//!
//! #[derive(Clone)]
//! struct Sample {
//!     key: String,
//!     value: i32,
//! }
//! impl_entry!(Sample, key);
//!
//! let mut store = DataStore::new();
//! let mut samples = store.typed::<Sample>();
//! samples.subscribe_to_updates(|_store, sample: &Sample, is_new| {
//!     println!("{} -> {} (new: {})", sample.key, sample.value, is_new);
//! });
//! samples.add(Sample { key: "a".to_string(), value: 1 });
//! assert_eq!(samples.count(), 1);
//! ```

use std::any::{type_name, Any};
use std::marker::PhantomData;
use std::rc::Rc;

use crate::entry::Entry;
use crate::hashing::HashMap;
use crate::inspect::{describe_entry, short_type_name, Node};
use crate::listeners::{ListenerId, Listeners};
use crate::log::trace;
use crate::store::{DataStore, StoredTable};
use crate::table::Table;

pub(crate) type UpdateHandler<T> = dyn Fn(&mut DataStore, &T, bool);
pub(crate) type KeyUpdateHandler<T> = dyn Fn(&mut DataStore, &T);
pub(crate) type DeleteHandler<T> = dyn Fn(&mut DataStore, &T);

/// The table and observers of one stored type.
pub(crate) struct TypedTable<T: Entry> {
    table: Table,
    update_listeners: Listeners<UpdateHandler<T>>,
    delete_listeners: Listeners<DeleteHandler<T>>,
    // Not pruned when a key leaves the table: a later add of the same key still notifies.
    key_listeners: HashMap<String, Listeners<KeyUpdateHandler<T>>>,
}

impl<T: Entry> Default for TypedTable<T> {
    fn default() -> Self {
        TypedTable {
            table: Table::new(),
            update_listeners: Listeners::default(),
            delete_listeners: Listeners::default(),
            key_listeners: HashMap::default(),
        }
    }
}

impl<T: Entry> TypedTable<T> {
    pub(crate) fn get(&self, key: &str) -> Option<&T> {
        self.table.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.table
            .get_mut(key)
            .and_then(|value| value.downcast_mut::<T>())
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.table
            .values()
            .filter_map(|value| value.downcast_ref::<T>())
    }

    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.table.contains(key)
    }
}

impl<T: Entry> StoredTable for TypedTable<T> {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn contains(&self, key: &str) -> bool {
        self.table.contains(key)
    }

    fn reset(&mut self) {
        self.table.clear();
        self.update_listeners.clear();
        self.delete_listeners.clear();
        self.key_listeners.clear();
    }

    fn describe_entries(&self) -> Vec<Node> {
        self.values().map(|value| describe_entry(value)).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Type-safe access to the table storing `T`.
///
/// Holding a `Typed` borrows the store mutably; drop it (or use the pass-through methods on
/// [`DataStore`]) to work with other types.
pub struct Typed<'a, T: Entry> {
    store: &'a mut DataStore,
    _entry: PhantomData<T>,
}

impl<'a, T: Entry + Clone> Typed<'a, T> {
    pub(crate) fn new(store: &'a mut DataStore) -> Self {
        store.register::<T>();
        Typed {
            store,
            _entry: PhantomData,
        }
    }

    fn state(&self) -> Option<&TypedTable<T>> {
        self.store.typed_table::<T>()
    }

    fn state_mut(&mut self) -> &mut TypedTable<T> {
        self.store.typed_table_mut::<T>()
    }

    /// The short name this type is listed under by the inspection interface.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        short_type_name(type_name::<T>())
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.store.count::<T>()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains::<T>(key)
    }

    /// Iterates the stored values in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &T> {
        self.store.all::<T>()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.store.get::<T>(key)
    }

    /// Returns the stored value itself. Changes made through the reference are not observed;
    /// call [`Typed::update`] to notify observers.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.state_mut().get_mut(key)
    }

    /// Returns a copy of the stored value, or `T::default()` if the key is absent.
    #[must_use]
    pub fn get_or_default(&self, key: &str) -> T
    where
        T: Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Returns a random 32 character alphanumeric key that is not present in the table.
    pub fn random_key(&mut self) -> String {
        self.store.unique_key_for::<T>()
    }

    /// Inserts `value` under its key, replacing any value with the same key, then notifies the
    /// update observers followed by the observers of that key.
    pub fn add(&mut self, value: T) {
        let key = value.key().to_string();
        let snapshot = self.has_update_listeners(&key).then(|| value.clone());
        let is_new = self.state_mut().table.insert(key.clone(), Box::new(value));
        trace!(
            "{} {}: {key}",
            if is_new { "added" } else { "updated" },
            self.type_name()
        );

        if let Some(value) = snapshot {
            self.emit_update(&key, &value, is_new);
        }
    }

    /// Adds each value in order.
    pub fn add_all(&mut self, values: impl IntoIterator<Item = T>) {
        for value in values {
            self.add(value);
        }
    }

    /// Same as [`Typed::add`]. Re-adding a value is how a change is published.
    pub fn update(&mut self, value: T) {
        self.add(value);
    }

    /// Removes the value stored under `key`. Delete observers run first, while the value is
    /// still in the table. Returns `true` if a value was removed.
    ///
    /// The remaining values keep their insertion order, so this is linear in the number of values
    /// added after `key`.
    pub fn remove(&mut self, key: &str) -> bool {
        self.remove_with(key, Table::remove)
    }

    fn remove_with(&mut self, key: &str, remove: fn(&mut Table, &str) -> bool) -> bool {
        if self.has_delete_listeners() {
            if let Some(value) = self.get(key).cloned() {
                self.emit_delete(&value);
            }
        }

        let removed = remove(&mut self.state_mut().table, key);
        if removed {
            trace!("removed {}: {key}", self.type_name());
        }
        removed
    }

    pub fn remove_value(&mut self, value: &T) -> bool {
        self.remove(value.key())
    }

    /// Removes each value in order. Returns `true` if ANY of them was not present.
    pub fn remove_values(&mut self, values: &[T]) -> bool {
        let mut failed = false;
        for value in values {
            if !self.remove_value(value) {
                failed = true;
            }
        }
        failed
    }

    /// Removes every value, notifying the delete observers for each one in insertion order,
    /// then resets the table: it is emptied and every observer of this type is dropped. Runs in
    /// time linear in the size of the table. Always returns `true`.
    pub fn remove_all(&mut self) -> bool {
        let keys = self
            .state()
            .map(|state| state.table.keys())
            .unwrap_or_default();
        // The order comes from `keys`, so the table itself may reorder as it drains.
        for key in &keys {
            self.remove_with(key, Table::remove_unordered);
        }
        self.store.reset_type::<T>();
        true
    }

    /// Registers an observer for updates to one key.
    pub fn add_update_listener(
        &mut self,
        key: impl Into<String>,
        listener: impl Fn(&mut DataStore, &T) + 'static,
    ) -> ListenerId {
        let id = self.store.next_listener_id();
        self.state_mut()
            .key_listeners
            .entry(key.into())
            .or_default()
            .push(id, Rc::new(listener));
        id
    }

    pub fn remove_update_listener(&mut self, key: &str, id: ListenerId) -> bool {
        self.state_mut()
            .key_listeners
            .get_mut(key)
            .is_some_and(|listeners| listeners.remove(id))
    }

    /// Registers an observer for every add or update. It receives the value and whether its key
    /// was new to the table.
    pub fn subscribe_to_updates(
        &mut self,
        listener: impl Fn(&mut DataStore, &T, bool) + 'static,
    ) -> ListenerId {
        let id = self.store.next_listener_id();
        self.state_mut().update_listeners.push(id, Rc::new(listener));
        id
    }

    pub fn unsubscribe_from_updates(&mut self, id: ListenerId) -> bool {
        self.state_mut().update_listeners.remove(id)
    }

    /// Registers an observer for every removal. It runs before the value leaves the table.
    pub fn subscribe_to_deletes(
        &mut self,
        listener: impl Fn(&mut DataStore, &T) + 'static,
    ) -> ListenerId {
        let id = self.store.next_listener_id();
        self.state_mut().delete_listeners.push(id, Rc::new(listener));
        id
    }

    pub fn unsubscribe_from_deletes(&mut self, id: ListenerId) -> bool {
        self.state_mut().delete_listeners.remove(id)
    }

    /// Drops every update observer of this type. Per-key observers are kept.
    pub fn clear_add_event(&mut self) {
        self.state_mut().update_listeners.clear();
    }

    /// Drops every delete observer of this type.
    pub fn clear_delete_event(&mut self) {
        self.state_mut().delete_listeners.clear();
    }

    fn has_update_listeners(&self, key: &str) -> bool {
        self.state().is_some_and(|state| {
            !state.update_listeners.is_empty()
                || state
                    .key_listeners
                    .get(key)
                    .is_some_and(|listeners| !listeners.is_empty())
        }) || self.store.has_erased_add_listeners::<T>()
    }

    fn has_delete_listeners(&self) -> bool {
        self.state()
            .is_some_and(|state| !state.delete_listeners.is_empty())
            || self.store.has_erased_delete_listeners::<T>()
    }

    fn emit_update(&mut self, key: &str, value: &T, is_new: bool) {
        let (all, by_key) = self
            .state()
            .map(|state| {
                let by_key = state
                    .key_listeners
                    .get(key)
                    .map(Listeners::snapshot)
                    .unwrap_or_default();
                (state.update_listeners.snapshot(), by_key)
            })
            .unwrap_or_default();
        let erased = self.store.erased_add_listeners::<T>();

        for listener in all {
            listener(&mut *self.store, value, is_new);
        }
        for listener in by_key {
            listener(&mut *self.store, value);
        }
        let entry: &dyn Entry = value;
        for listener in erased {
            listener(&mut *self.store, entry, is_new);
        }
    }

    fn emit_delete(&mut self, value: &T) {
        let listeners = self
            .state()
            .map(|state| state.delete_listeners.snapshot())
            .unwrap_or_default();
        let erased = self.store.erased_delete_listeners::<T>();

        for listener in listeners {
            listener(&mut *self.store, value);
        }
        let entry: &dyn Entry = value;
        for listener in erased {
            listener(&mut *self.store, entry);
        }
    }
}
