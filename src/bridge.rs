//! Routes records from the `log` facade through a `Logger`, so dependencies
//! that log via `log::info!` and friends share its format.

use crate::domain::{Level, Metadata};
use crate::logger::Logger;

/// `log::Log` implementation writing through a `Logger`.
#[derive(Debug, Clone)]
pub struct LogBridge {
    logger: Logger,
}

impl LogBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// `Trace` has no counterpart and folds into DEBUG.
pub fn level_for(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warning,
        log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        !(level_for(metadata.level()) == Level::Debug && self.logger.options().is_production())
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // A target equal to the module path says nothing new.
        let meta = match record.module_path() {
            Some(module) if module == record.target() => None,
            _ => Some(Metadata::new().with("target", record.target())),
        };
        let caller = match (record.file(), record.line()) {
            (Some(file), Some(line)) => Some(format!("{file}:{line}")),
            _ => None,
        };

        self.logger.log_at(
            level_for(record.level()),
            record.args().to_string(),
            meta,
            caller.as_deref(),
        );
    }

    fn flush(&self) {}
}

/// Installs `logger` as the process-wide `log` backend.
///
/// Fails if another `log` backend was installed first.
pub fn init_log_bridge(
    logger: Logger,
    max_level: log::LevelFilter,
) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(logger)))?;
    log::set_max_level(max_level);
    Ok(())
}
