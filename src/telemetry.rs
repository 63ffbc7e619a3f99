//! Tracing subscriber bootstrap.
//!
//! The engine itself only *emits* `tracing` spans and events (node entry
//! and exit go through the engine's logging middleware); installing a
//! subscriber is the embedding application's decision. This helper wires
//! the conventional fmt + env-filter stack for binaries and examples that
//! don't bring their own.

use tracing_subscriber::EnvFilter;

/// Install the default fmt subscriber, filtered by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset. Safe to call more than
/// once; subsequent calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
