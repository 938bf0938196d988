//! Shared helpers for rowsel test binaries.

#![forbid(unsafe_code)]

use std::sync::OnceLock;

static TRACING: OnceLock<()> = OnceLock::new();

/// Install a tracing subscriber tuned for rowsel test runs. Every test may
/// call this; only the first call installs.
///
/// Without `RUST_LOG` the filter defaults to debug output from the rowsel
/// crates and warnings from everything else. Thread names are emitted so
/// interleaved lines from the shared pool workers (`rowsel-worker-*`) can be
/// told apart in parallel filter tests, and output goes through the test
/// writer so it stays attached to the test that produced it.
pub fn init_tracing_for_tests() {
    TRACING.get_or_init(|| {
        use tracing_subscriber::filter::EnvFilter;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "warn,rowsel=debug,rowsel_index=debug,rowsel_filter=debug,rowsel_threading=debug",
            )
        });
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .with_test_writer()
            .try_init();
    });
}
