//! Tracing setup for furl binaries.
//!
//! Console output only; `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

pub fn init(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .compact()
        .init();
}
