//! Tracing/logging initialization.
//!
//! Both entry points honor `RUST_LOG` and are safe to call repeatedly;
//! only the first successful call installs a subscriber.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// JSON logs with timestamps for long-running hosts.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(DEFAULT_FILTER))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Compact, human-readable logs captured by the test harness.
///
/// Defaults to `debug` for the portal crates so gate decisions show up in
/// failing test output.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("portal_auth=debug,portal_onboarding=debug"))
        .compact()
        .with_test_writer()
        .try_init();
}
