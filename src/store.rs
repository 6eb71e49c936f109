//! The registry: one context object owning every table.
//!
//! A [`DataStore`] holds one table per stored type, keyed by `TypeId`. Tables are created
//! lazily the first time a type is mutated or its facade is requested, and they are remembered
//! in the order they were created. [`DataStore::clear`] resets all of them in that order.
//!
//! Most methods here are thin pass-throughs to [`Typed`], the per-type facade. The one thing
//! the registry adds is a second, type-erased set of add/delete observers per type
//! ([`DataStore::add_listener`], [`DataStore::delete_listener`]). They are stored apart from the
//! facade's own observers, but since every mutation goes through the facade, both sets fire on
//! the same calls: facade observers first, then the type-erased ones.

use std::any::{Any, TypeId};
use std::rc::Rc;

use indexmap::IndexMap;
use rand::rngs::StdRng;

use crate::config::StoreConfig;
use crate::entry::Entry;
use crate::error::DataStoreError;
use crate::hashing::HashMap;
use crate::inspect::{short_type_name, Node};
use crate::listeners::{ListenerId, Listeners};
use crate::log::{configure as configure_logging, debug};
use crate::random::{seeded_rng, unique_key};
use crate::typed::{Typed, TypedTable};

pub(crate) type ErasedAddHandler = dyn Fn(&mut DataStore, &dyn Entry, bool);
pub(crate) type ErasedDeleteHandler = dyn Fn(&mut DataStore, &dyn Entry);

/// A type-erased handle to the table of one stored type.
pub(crate) trait StoredTable {
    fn type_name(&self) -> &'static str;
    fn len(&self) -> usize;
    fn contains(&self, key: &str) -> bool;
    /// Empties the table and drops every observer attached to it.
    fn reset(&mut self);
    fn describe_entries(&self) -> Vec<Node>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub struct DataStore {
    // Insertion order is registration order, which is the order `clear` resets in.
    tables: IndexMap<TypeId, Box<dyn StoredTable>>,
    add_listeners: HashMap<TypeId, Listeners<ErasedAddHandler>>,
    delete_listeners: HashMap<TypeId, Listeners<ErasedDeleteHandler>>,
    listener_counter: u64,
    rng: StdRng,
}

impl DataStore {
    /// Creates an empty store whose key generator is seeded from the OS.
    #[must_use]
    pub fn new() -> DataStore {
        DataStore {
            tables: IndexMap::new(),
            add_listeners: HashMap::default(),
            delete_listeners: HashMap::default(),
            listener_counter: 0,
            rng: seeded_rng(None),
        }
    }

    /// Creates an empty store from a configuration, applying its seed and log levels. Levels
    /// the configuration leaves out keep their current setting.
    pub fn with_config(config: &StoreConfig) -> Result<DataStore, DataStoreError> {
        let global = config.log_level_filter()?;
        let modules = config.module_level_filters()?;
        if global.is_some() || !modules.is_empty() {
            configure_logging(global, &modules);
        }

        let mut store = DataStore::new();
        if let Some(seed) = config.random_seed {
            store.init_random(seed);
        }
        Ok(store)
    }

    /// Reseeds the key generator so that subsequent random keys are reproducible.
    pub fn init_random(&mut self, seed: u64) {
        self.rng = seeded_rng(Some(seed));
    }

    /// Returns the facade for `T`, creating its table on first use.
    pub fn typed<T: Entry + Clone>(&mut self) -> Typed<'_, T> {
        Typed::new(self)
    }

    pub(crate) fn register<T: Entry>(&mut self) {
        let type_id = TypeId::of::<T>();
        if !self.tables.contains_key(&type_id) {
            debug!("registering table for {}", std::any::type_name::<T>());
            self.tables
                .insert(type_id, Box::new(TypedTable::<T>::default()));
        }
    }

    pub(crate) fn typed_table<T: Entry>(&self) -> Option<&TypedTable<T>> {
        self.tables
            .get(&TypeId::of::<T>())
            .and_then(|table| table.as_any().downcast_ref::<TypedTable<T>>())
    }

    pub(crate) fn typed_table_mut<T: Entry>(&mut self) -> &mut TypedTable<T> {
        self.register::<T>();
        self.tables
            .get_mut(&TypeId::of::<T>())
            .and_then(|table| table.as_any_mut().downcast_mut::<TypedTable<T>>())
            .expect("table registered under the TypeId of another type")
    }

    pub(crate) fn next_listener_id(&mut self) -> ListenerId {
        let id = ListenerId::new(self.listener_counter);
        self.listener_counter += 1;
        id
    }

    pub(crate) fn unique_key_for<T: Entry>(&mut self) -> String {
        let table = self.tables.get(&TypeId::of::<T>());
        unique_key(&mut self.rng, |candidate| {
            table.is_some_and(|table| table.contains(candidate))
        })
    }

    /// Empties the table of `T` and drops every observer of `T`, facade and type-erased alike.
    pub(crate) fn reset_type<T: Entry>(&mut self) {
        let type_id = TypeId::of::<T>();
        if let Some(table) = self.tables.get_mut(&type_id) {
            table.reset();
        }
        self.add_listeners.remove(&type_id);
        self.delete_listeners.remove(&type_id);
    }

    pub(crate) fn has_erased_add_listeners<T: Entry>(&self) -> bool {
        self.add_listeners
            .get(&TypeId::of::<T>())
            .is_some_and(|listeners| !listeners.is_empty())
    }

    pub(crate) fn has_erased_delete_listeners<T: Entry>(&self) -> bool {
        self.delete_listeners
            .get(&TypeId::of::<T>())
            .is_some_and(|listeners| !listeners.is_empty())
    }

    pub(crate) fn erased_add_listeners<T: Entry>(&self) -> Vec<Rc<ErasedAddHandler>> {
        self.add_listeners
            .get(&TypeId::of::<T>())
            .map(Listeners::snapshot)
            .unwrap_or_default()
    }

    pub(crate) fn erased_delete_listeners<T: Entry>(&self) -> Vec<Rc<ErasedDeleteHandler>> {
        self.delete_listeners
            .get(&TypeId::of::<T>())
            .map(Listeners::snapshot)
            .unwrap_or_default()
    }

    // Reads. An unregistered type reads as an empty table and stays unregistered.

    #[must_use]
    pub fn count<T: Entry>(&self) -> usize {
        self.typed_table::<T>().map_or(0, TypedTable::len)
    }

    #[must_use]
    pub fn contains<T: Entry>(&self, key: &str) -> bool {
        self.typed_table::<T>()
            .is_some_and(|table| table.contains(key))
    }

    #[must_use]
    pub fn get<T: Entry>(&self, key: &str) -> Option<&T> {
        self.typed_table::<T>().and_then(|table| table.get(key))
    }

    /// Returns the stored value itself. Changes made through the reference are not observed.
    pub fn get_mut<T: Entry>(&mut self, key: &str) -> Option<&mut T> {
        self.tables
            .get_mut(&TypeId::of::<T>())
            .and_then(|table| table.as_any_mut().downcast_mut::<TypedTable<T>>())
            .and_then(|table| table.get_mut(key))
    }

    /// Returns a copy of the stored value, or `T::default()` if it is absent.
    #[must_use]
    pub fn get_or_default<T: Entry + Clone + Default>(&self, key: &str) -> T {
        self.get::<T>(key).cloned().unwrap_or_default()
    }

    pub fn all<T: Entry>(&self) -> impl Iterator<Item = &T> {
        self.typed_table::<T>()
            .into_iter()
            .flat_map(|table| table.values())
    }

    // Mutations, forwarded to the facade.

    pub fn add<T: Entry + Clone>(&mut self, value: T) {
        self.typed::<T>().add(value);
    }

    pub fn add_all<T: Entry + Clone>(&mut self, values: impl IntoIterator<Item = T>) {
        self.typed::<T>().add_all(values);
    }

    pub fn update<T: Entry + Clone>(&mut self, value: T) {
        self.typed::<T>().update(value);
    }

    pub fn remove<T: Entry + Clone>(&mut self, key: &str) -> bool {
        self.typed::<T>().remove(key)
    }

    pub fn remove_value<T: Entry + Clone>(&mut self, value: &T) -> bool {
        self.typed::<T>().remove_value(value)
    }

    /// Returns `true` if ANY of the values was not present.
    pub fn remove_values<T: Entry + Clone>(&mut self, values: &[T]) -> bool {
        self.typed::<T>().remove_values(values)
    }

    pub fn remove_all<T: Entry + Clone>(&mut self) -> bool {
        self.typed::<T>().remove_all()
    }

    pub fn random_key<T: Entry + Clone>(&mut self) -> String {
        self.typed::<T>().random_key()
    }

    /// Resets every table in the order the types were first used: each is emptied and loses
    /// its observers, including the type-erased ones. The tables stay registered and usable.
    pub fn clear(&mut self) {
        let entries: usize = self.tables.values().map(|table| table.len()).sum();
        debug!(
            "clearing {} tables holding {} entries",
            self.tables.len(),
            entries
        );
        for table in self.tables.values_mut() {
            table.reset();
        }
        self.add_listeners.clear();
        self.delete_listeners.clear();
    }

    // Type-erased observers.

    /// Registers a type-erased observer for every add or update of `T`.
    pub fn add_listener<T: Entry>(
        &mut self,
        listener: impl Fn(&mut DataStore, &dyn Entry, bool) + 'static,
    ) -> ListenerId {
        let id = self.next_listener_id();
        self.add_listeners
            .entry(TypeId::of::<T>())
            .or_default()
            .push(id, Rc::new(listener));
        id
    }

    pub fn remove_add_listener<T: Entry>(&mut self, id: ListenerId) -> bool {
        remove_erased_listener(&mut self.add_listeners, TypeId::of::<T>(), id)
    }

    pub fn remove_all_add_listeners<T: Entry>(&mut self) {
        self.add_listeners.remove(&TypeId::of::<T>());
    }

    /// Drops the type-erased add observers of every type.
    pub fn clear_all_add_events(&mut self) {
        self.add_listeners.clear();
    }

    /// Registers a type-erased observer for every removal of `T`. It runs before the value
    /// leaves the table.
    pub fn delete_listener<T: Entry>(
        &mut self,
        listener: impl Fn(&mut DataStore, &dyn Entry) + 'static,
    ) -> ListenerId {
        let id = self.next_listener_id();
        self.delete_listeners
            .entry(TypeId::of::<T>())
            .or_default()
            .push(id, Rc::new(listener));
        id
    }

    pub fn remove_delete_listener<T: Entry>(&mut self, id: ListenerId) -> bool {
        remove_erased_listener(&mut self.delete_listeners, TypeId::of::<T>(), id)
    }

    pub fn remove_all_delete_listeners<T: Entry>(&mut self) {
        self.delete_listeners.remove(&TypeId::of::<T>());
    }

    /// Drops the type-erased delete observers of every type.
    pub fn clear_all_delete_events(&mut self) {
        self.delete_listeners.clear();
    }

    // Inspection.

    #[must_use]
    pub fn is_registered<T: Entry>(&self) -> bool {
        self.tables.contains_key(&TypeId::of::<T>())
    }

    /// The short names of every registered type, in registration order.
    #[must_use]
    pub fn registered_type_names(&self) -> Vec<&'static str> {
        self.tables
            .values()
            .map(|table| short_type_name(table.type_name()))
            .collect()
    }

    /// Renders the entries of the first registered type whose short or full name is `name`.
    /// The returned root is labeled `root` and has one child per stored entry.
    #[must_use]
    pub fn describe_type(&self, name: &str) -> Option<Node> {
        self.tables
            .values()
            .find(|table| {
                let full_name = table.type_name();
                full_name == name || short_type_name(full_name) == name
            })
            .map(|table| Node::with_children("root", table.describe_entries()))
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_erased_listener<F: ?Sized>(
    listeners: &mut HashMap<TypeId, Listeners<F>>,
    type_id: TypeId,
    id: ListenerId,
) -> bool {
    let Some(registered) = listeners.get_mut(&type_id) else {
        return false;
    };
    let removed = registered.remove(id);
    if registered.is_empty() {
        listeners.remove(&type_id);
    }
    removed
}
