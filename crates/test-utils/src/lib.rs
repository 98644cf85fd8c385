// crates/test-utils/src/lib.rs

//! Shared helpers for the `cleanexec` test suite: settings/config builders,
//! preconfigured mock processes and a one-shot tracing setup.

pub mod builders;
pub mod platforms;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

use cleanexec::logging::LOG_ENV;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// The filter comes from `CLEANEXEC_LOG` (same variable the binary reads),
/// defaulting to `debug` so a failing launcher test shows every step it took.
/// Output is captured by the harness unless run with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("debug"));

        // Another test in the same binary may already have installed one.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}
