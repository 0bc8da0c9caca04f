#![cfg(feature = "std")]

use std::env;
use log::{self, LevelFilter, Metadata, Record};

/// Environment variable holding the log level (`error`..`trace`).
pub const LOG_ENV: &str = "IR_BATTLESHIP_LOG";

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        // stdout carries frames and reports.
        if self.enabled(record.metadata()) {
            eprintln!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Initialize logging with a level taken from `IR_BATTLESHIP_LOG`.
/// Defaults to `info` if the variable is not set or invalid.
pub fn init_logging() {
    init_logging_with_default(LevelFilter::Info);
}

/// Like [`init_logging`] with a caller-chosen fallback level. Only the first
/// call installs the logger.
pub fn init_logging_with_default(default: LevelFilter) {
    let level = env::var(LOG_ENV)
        .ok()
        .and_then(|lvl| lvl.parse().ok())
        .unwrap_or(default);
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));
}
