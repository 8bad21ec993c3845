//! Tracing subscriber setup.
//!
//! Logs always go to stderr; stdout carries the stdio MCP channel.

use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG` when set, otherwise from `level`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns `false` when one was already set,
/// in which case it is kept.
pub fn init_logging(level: &str, json: bool) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
