//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the recheck tracing/logging system.
///
/// Reads the `RECHECK_LOG` environment variable for per-subsystem log
/// levels. Format: `RECHECK_LOG=selection=debug,config=info`
///
/// Falls back to `recheck=info` if `RECHECK_LOG` is not set or invalid.
///
/// This function is idempotent — calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("RECHECK_LOG")
            .unwrap_or_else(|_| EnvFilter::new("recheck=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}
