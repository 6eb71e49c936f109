//! Logging setup.
//!
//! The store logs through the [`log`] facade: table registration and global clears at `debug`,
//! every add and removal at `trace`. The five macros are re-exported so applications can log
//! through the same facade:
//!
//! ```rust
//! use datastore::info;
//!
//! info!("loading fixtures");
//! ```
//!
//! Nothing is printed until a level is set, either through the `log_level` and
//! `module_log_levels` fields of a [`StoreConfig`](crate::StoreConfig) or from code:
//!
//! ```rust
//! use datastore::log::{set_log_level, set_module_filter, LevelFilter};
//!
//! set_log_level(LevelFilter::Warn);
//! // Every add and removal, while the rest of the store stays quiet.
//! set_module_filter("datastore::typed", LevelFilter::Trace);
//! ```
//!
//! With the `logging` feature, output goes to stdout through `log4rs`. Without it only the
//! facade's max level is kept up to date.
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

use std::collections::BTreeMap;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

pub use log::{debug, error, info, trace, warn, LevelFilter};

static LOG_STATE: LazyLock<Mutex<LogState>> = LazyLock::new(Mutex::default);

/// The level filters in force.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLevels {
    /// Applies to every module without its own filter. `Off` silences them.
    pub global: LevelFilter,
    /// Filters keyed by module path, such as `"datastore::store"`.
    pub modules: BTreeMap<String, LevelFilter>,
}

impl Default for LogLevels {
    fn default() -> Self {
        LogLevels {
            global: LevelFilter::Off,
            modules: BTreeMap::new(),
        }
    }
}

#[derive(Default)]
struct LogState {
    levels: LogLevels,
    #[cfg(feature = "logging")]
    handle: Option<log4rs::Handle>,
}

fn log_state() -> MutexGuard<'static, LogState> {
    // The guarded data is only ever replaced whole, so a poisoned lock is still consistent.
    LOG_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `change` on the current levels and reinstalls the logger if it reports a difference.
fn update(change: impl FnOnce(&mut LogLevels) -> bool) {
    let mut state = log_state();
    if change(&mut state.levels) {
        state.install();
    }
}

fn replace_level(slot: &mut LevelFilter, level: LevelFilter) -> bool {
    std::mem::replace(slot, level) != level
}

fn insert_module(levels: &mut LogLevels, module: &str, level: LevelFilter) -> bool {
    levels.modules.insert(module.to_string(), level) != Some(level)
}

#[must_use]
pub fn log_levels() -> LogLevels {
    log_state().levels.clone()
}

/// Equivalent to `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Equivalent to `set_log_level(LevelFilter::Off)`. Module filters are kept.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

pub fn set_log_level(level: LevelFilter) {
    update(|levels| replace_level(&mut levels.global, level));
}

/// Filters the messages of one module path independently of the global level.
pub fn set_module_filter(module: &str, level: LevelFilter) {
    update(|levels| insert_module(levels, module, level));
}

/// Hands `module` back to the global level.
pub fn remove_module_filter(module: &str) {
    update(|levels| levels.modules.remove(module).is_some());
}

/// Sets the global level, when given, and every module filter in `modules`, reinstalling the
/// logger at most once.
pub fn configure(global: Option<LevelFilter>, modules: &[(String, LevelFilter)]) {
    update(|levels| {
        let mut changed = global.is_some_and(|global| replace_level(&mut levels.global, global));
        for (module, level) in modules {
            changed |= insert_module(levels, module, *level);
        }
        changed
    });
}

/// Serializes tests that touch the process-wide log levels.
#[cfg(test)]
pub(crate) static TEST_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);
