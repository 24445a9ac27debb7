use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system with environment-based filtering
///
/// Diagnostics go to stderr so that stdout carries only the report:
/// - `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// - JSON with flattened fields when stderr is not a terminal, compact text otherwise
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let builder = fmt().with_env_filter(filter).with_writer(io::stderr);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = match default_log_mode() {
        LogMode::Json => builder.json().flatten_event(true).try_init(),
        LogMode::Pretty => builder.compact().without_time().with_target(false).try_init(),
    };
}

pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn default_log_mode() -> LogMode {
    if io::stderr().is_terminal() {
        LogMode::Pretty
    } else {
        LogMode::Json
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Json,
    Pretty,
}
