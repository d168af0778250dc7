//! Tracing setup helpers.
//!
//! The crate logs through `tracing` macros everywhere; embedders that do not
//! install their own subscriber can call [`init_logging`] once at startup.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes a global tracing subscriber honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    init_logging_with_filter("info");
}

/// Initializes a global tracing subscriber with a default filter directive.
///
/// `RUST_LOG` still takes precedence when set. Safe to call more than once.
pub fn init_logging_with_filter(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = fmt().with_env_filter(filter).try_init();
}
