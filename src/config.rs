//! Store configuration, loaded from JSON.
//!
//! ```json
//! {
//!     "random_seed": 42,
//!     "log_level": "warn",
//!     "module_log_levels": { "datastore::typed": "trace" }
//! }
//! ```
//!
//! Every field is optional. Unknown fields are rejected so that a misspelled setting doesn't
//! go unnoticed.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataStoreError;
use crate::log::LevelFilter;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Seeds the random key generator. Without it, keys differ from run to run.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace` (case-insensitive).
    #[serde(default)]
    pub log_level: Option<String>,
    /// Levels for individual module paths, overriding `log_level` for those modules.
    #[serde(default)]
    pub module_log_levels: BTreeMap<String, String>,
}

impl StoreConfig {
    pub fn from_json_str(json: &str) -> Result<StoreConfig, DataStoreError> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<StoreConfig, DataStoreError> {
        let reader = BufReader::new(File::open(path)?);
        let config: StoreConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), DataStoreError> {
        self.log_level_filter()?;
        self.module_level_filters()?;
        Ok(())
    }

    /// Parses `log_level`, if set.
    pub fn log_level_filter(&self) -> Result<Option<LevelFilter>, DataStoreError> {
        self.log_level.as_deref().map(parse_level).transpose()
    }

    /// Parses `module_log_levels`, in module path order.
    pub fn module_level_filters(&self) -> Result<Vec<(String, LevelFilter)>, DataStoreError> {
        self.module_log_levels
            .iter()
            .map(|(module, level)| parse_level(level).map(|filter| (module.clone(), filter)))
            .collect()
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, DataStoreError> {
    LevelFilter::from_str(level).map_err(|_| DataStoreError::InvalidLogLevel(level.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_object_is_default() {
        let config = StoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.log_level_filter().unwrap(), None);
    }

    #[test]
    fn parses_all_fields() {
        let config =
            StoreConfig::from_json_str(r#"{"random_seed": 42, "log_level": "Debug"}"#).unwrap();
        assert_eq!(config.random_seed, Some(42));
        assert_eq!(config.log_level_filter().unwrap(), Some(LevelFilter::Debug));
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = StoreConfig::from_json_str(r#"{"random_sead": 42}"#);
        assert!(matches!(result, Err(DataStoreError::JsonError(_))));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let result = StoreConfig::from_json_str(r#"{"log_level": "loud"}"#);
        assert!(
            matches!(result, Err(DataStoreError::InvalidLogLevel(ref level)) if level == "loud")
        );
    }

    #[test]
    fn parses_module_levels() {
        let config = StoreConfig::from_json_str(
            r#"{"module_log_levels": {"datastore::typed": "trace", "datastore::store": "OFF"}}"#,
        )
        .unwrap();
        assert_eq!(config.log_level_filter().unwrap(), None);
        assert_eq!(
            config.module_level_filters().unwrap(),
            vec![
                ("datastore::store".to_string(), LevelFilter::Off),
                ("datastore::typed".to_string(), LevelFilter::Trace),
            ]
        );
    }

    #[test]
    fn rejects_unknown_module_level() {
        let result =
            StoreConfig::from_json_str(r#"{"module_log_levels": {"datastore::typed": "noisy"}}"#);
        assert!(
            matches!(result, Err(DataStoreError::InvalidLogLevel(ref level)) if level == "noisy")
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"random_seed": 7}}"#).unwrap();
        let config = StoreConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.random_seed, Some(7));
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = StoreConfig::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(DataStoreError::IoError(_))));
    }
}
