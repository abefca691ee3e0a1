//! Tracing subscriber initialization.
//!
//! JSON lines on stdout, filtered by `RUST_LOG` (default `info`). Use
//! `RUST_LOG=msstudy_infra=debug,msstudy_api=debug` to see per-request
//! service and resource logs.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber unless one is already set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .try_init();
}
