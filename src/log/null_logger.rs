//! Used when the `logging` feature is disabled: nothing is written anywhere, but the facade's
//! max level still follows the configured levels.

use crate::log::LogState;

impl LogState {
    pub(super) fn install(&mut self) {
        let most_verbose = self
            .levels
            .modules
            .values()
            .copied()
            .fold(self.levels.global, Ord::max);
        log::set_max_level(most_verbose);
    }
}
