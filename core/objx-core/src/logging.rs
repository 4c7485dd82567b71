//! Subscriber setup for store events
//!
//! `ObjectStore` reports queries at INFO, save decisions at DEBUG and
//! duplicate identities at WARN. These helpers install a `fmt` subscriber
//! for binaries and tests; without the `logging` feature they are no-ops.

#[cfg(feature = "logging")]
use tracing_subscriber::{EnvFilter, fmt};

/// Shows compiled queries and duplicate identity warnings; `RUST_LOG` wins.
///
/// ```rust
/// objx_core::logging::init();
/// ```
#[cfg(feature = "logging")]
pub fn init() {
    init_with_level("info")
}

/// Subscriber filtered at `level` unless `RUST_LOG` is set, e.g. `"debug"`
/// to follow each save through insert, update or duplicate.
///
/// Returns quietly if a global subscriber is already installed.
#[cfg(feature = "logging")]
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init();
}

/// `objx_core=debug` through the test harness capture, so save decisions
/// show up next to a failing assertion.
#[cfg(feature = "logging")]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("objx_core=debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(not(feature = "logging"))]
pub fn init() {}

#[cfg(not(feature = "logging"))]
pub fn init_with_level(_level: &str) {}

#[cfg(not(feature = "logging"))]
pub fn init_test() {}
