use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use crate::log::LogState;

// ISO 8601 timestamp, color coded level, then the module path
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";
const APPENDER: &str = "stdout";

impl LogState {
    /// Points the global logger at the current levels, installing it on first use.
    pub(super) fn install(&mut self) {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        let loggers = self
            .levels
            .modules
            .iter()
            .map(|(module, level)| Logger::builder().build(module.clone(), *level));
        let config = Config::builder()
            .appender(Appender::builder().build(APPENDER, Box::new(stdout)))
            .loggers(loggers)
            .build(Root::builder().appender(APPENDER).build(self.levels.global));

        let config = match config {
            Ok(config) => config,
            Err(e) => {
                log::warn!("rejected logger configuration: {e}");
                return;
            }
        };

        match self.handle {
            Some(ref handle) => handle.set_config(config),
            None => match log4rs::init_config(config) {
                Ok(handle) => self.handle = Some(handle),
                // Another logger was installed by the host application; leave it in charge.
                Err(e) => log::warn!("could not install the datastore logger: {e}"),
            },
        }
    }
}
