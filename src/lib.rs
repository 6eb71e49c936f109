//! An in-memory, type-indexed keyed data registry
//!
//! The central object is the [`DataStore`], which keeps one table per stored type. A stored
//! type implements [`Entry`], which gives every value a string key; the key is the value's
//! identity within its table. The store provides:
//! * Upserts by key: adding a value whose key is already present replaces the stored value
//! * Removal by key, by value, in bulk, or of a whole table
//! * Observers that run synchronously on every add, update, or removal, either for a whole
//!   type or for one key
//! * Random keys that are guaranteed not to collide with the keys already stored
//! * A global [`DataStore::clear`] that resets every table and drops every observer
//! * Read-only enumeration of the stored types and their contents for diagnostic tooling
//!
//! Each type is reached either through the generic methods on [`DataStore`] or through its
//! facade, [`Typed`], obtained with [`DataStore::typed`]. Both lead to the same table.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use datastore::{impl_entry, DataStore};
//!
//! #[derive(Clone)]
//! struct Sample {
//!     key: String,
//!     value: i32,
//! }
//! impl_entry!(Sample, key, [value]);
//!
//! let mut store = DataStore::new();
//! let deleted = Rc::new(RefCell::new(Vec::new()));
//! let deleted_clone = Rc::clone(&deleted);
//! store
//!     .typed::<Sample>()
//!     .subscribe_to_deletes(move |_store, sample| deleted_clone.borrow_mut().push(sample.value));
//!
//! store.add(Sample { key: "a".to_string(), value: 1 });
//! if let Some(sample) = store.get_mut::<Sample>("a") {
//!     // Not observed. Call `update` to notify observers of a change.
//!     sample.value = 100;
//! }
//! store.remove::<Sample>("a");
//! assert_eq!(*deleted.borrow(), vec![100]);
//! ```
//!
//! Everything runs on one thread: the store is neither `Send` nor `Sync`, and observers run
//! inline before the mutating call returns.
pub mod config;
pub mod entry;
pub mod error;
pub mod hashing;
pub mod inspect;
pub mod listeners;
pub mod log;
pub mod prelude;
pub mod random;
pub mod store;
pub mod table;
pub mod typed;

pub use config::StoreConfig;
pub use entry::{downcast_entry, Entry};
pub use error::DataStoreError;
pub use hashing::{HashMap, HashSet};
pub use listeners::ListenerId;
pub use store::DataStore;
pub use typed::Typed;

pub use crate::log::{debug, error, info, trace, warn};
