//! Diagnostic logging via `tracing`.
//!
//! Internal events (the resolver command line, keys removed from the
//! manifest, ...) are `tracing` events written to stderr. `-v` shows debug
//! events, `-vv` trace events; `RUST_LOG` overrides both.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber for the given verbosity.
pub fn setup_logging(verbosity: u8, quiet: bool) {
    let default_level = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("poetry_to_uv={default_level}")));

    // Ignore a second installation when embedded in another binary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
