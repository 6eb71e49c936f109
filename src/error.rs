use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `DataStoreError` and maps other errors to it.
///
/// The store itself never fails: lookups report a miss through `Option` or `bool`. This type
/// only covers the surfaces around it, such as loading a [`StoreConfig`](crate::StoreConfig).
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum DataStoreError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    InvalidLogLevel(String),
}

impl From<io::Error> for DataStoreError {
    fn from(error: io::Error) -> Self {
        DataStoreError::IoError(error)
    }
}

impl From<serde_json::Error> for DataStoreError {
    fn from(error: serde_json::Error) -> Self {
        DataStoreError::JsonError(error)
    }
}

impl std::error::Error for DataStoreError {}

impl Display for DataStoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataStoreError::InvalidLogLevel(level) => {
                write!(f, "Error: invalid log level {level:?}")
            }
            _ => write!(f, "Error: {self:?}"),
        }
    }
}
