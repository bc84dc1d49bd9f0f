#![deny(missing_docs)]
//! Logging helpers shared by the ragscope crates.
//!
//! Provides the `console_*` macros used across the workspace, the
//! `RAGSCOPE_LOG_LEVEL` override shared by the app and test loggers, and a
//! terminal logger for tests.

use log::LevelFilter;

/// Environment variable that overrides the log level, e.g. `debug`.
pub const LOG_LEVEL_ENV: &str = "RAGSCOPE_LOG_LEVEL";

/// Reads [`LOG_LEVEL_ENV`], falling back to `default` when it is unset or
/// not a level name.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    parse_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref(), default)
}

/// Parses a level name case-insensitively (`off`, `error` … `trace`).
pub fn parse_level(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value
        .map(str::trim)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Logs a trace-level message.
#[macro_export]
macro_rules! console_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message.
#[macro_export]
macro_rules! console_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message.
#[macro_export]
macro_rules! console_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message.
#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message.
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Installs a terminal logger for tests.
///
/// Safe to call from every test: a second initialisation is a no-op.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = level_from_env(if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
