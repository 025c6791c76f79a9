//! Shared test setup for the integration suite.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes `env_logger` once per test binary, so `log::debug!`/`log::warn!`
/// output from the passes is visible under `--nocapture` without every test
/// file repeating the boilerplate.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
