//! Tracing setup for applications embedding the bridge.

use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "warn";

/// Initialize the tracing subscriber, writing to stderr.
///
/// Use the RUST_LOG env var to control log level (e.g., RUST_LOG=sharegate_core=debug).
/// Returns false if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    init_tracing_with_default(DEFAULT_FILTER)
}

pub fn init_tracing_with_default(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
        .is_ok()
}
