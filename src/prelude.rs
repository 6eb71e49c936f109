pub use crate::config::StoreConfig;
pub use crate::entry::{downcast_entry, Entry};
pub use crate::error::DataStoreError;
pub use crate::impl_entry;
pub use crate::inspect::{Field, FieldValue, Node};
pub use crate::listeners::ListenerId;
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::store::DataStore;
pub use crate::typed::Typed;
