//! The contract every storable value fulfills.
//!
//! An [`Entry`] exposes a stable string key. The key identifies the value within the table of
//! its type: adding a second value with the same key replaces the first. Keys should be
//! non-empty and must not change while the value is stored, since the table indexes the value
//! under the key it had when it was added.
//!
//! Types usually implement `Entry` with the [`impl_entry!`](crate::impl_entry) macro:
//!
//! ```
//! use datastore::impl_entry;
//!
//! #[derive(Clone)]
//! struct Sample {
//!     key: String,
//!     value: i32,
//! }
//! impl_entry!(Sample, key, [value]);
//! ```

use std::any::Any;

use crate::inspect::Field;

/// A value that can be stored in a [`DataStore`](crate::DataStore).
///
/// The trait is object safe so that type-erased observers can receive `&dyn Entry`; use
/// [`downcast_entry`] to recover the concrete type.
pub trait Entry: Any {
    /// The identity of this value within its table.
    fn key(&self) -> &str;

    /// Describes the fields of this value for diagnostic tooling. Types that don't opt in show
    /// up with their key only.
    fn describe(&self) -> Vec<Field> {
        Vec::new()
    }
}

/// Recovers the concrete type of a type-erased entry.
pub fn downcast_entry<T: Entry>(entry: &dyn Entry) -> Option<&T> {
    let entry: &dyn Any = entry;
    entry.downcast_ref::<T>()
}

/// Implements [`Entry`] for a struct whose key is stored in a field.
///
/// The optional list of fields is used for [`Entry::describe`]; each listed field must
/// implement `Display`.
#[macro_export]
macro_rules! impl_entry {
    ($entry:ty, $key:ident) => {
        impl $crate::Entry for $entry {
            fn key(&self) -> &str {
                &self.$key
            }
        }
    };

    ($entry:ty, $key:ident, [$($field:ident),* $(,)?]) => {
        impl $crate::Entry for $entry {
            fn key(&self) -> &str {
                &self.$key
            }

            fn describe(&self) -> Vec<$crate::inspect::Field> {
                vec![$($crate::inspect::Field::scalar(stringify!($field), &self.$field)),*]
            }
        }
    };
}
