//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "LINKAGE_LOG";

/// Initialize the Linkage tracing/logging system.
///
/// Reads `LINKAGE_LOG` for per-module log levels, e.g.
/// `LINKAGE_LOG=linkage_analysis::pruning=debug,linkage_analysis::clustering=info`.
///
/// Falls back to `linkage=info` if `LINKAGE_LOG` is not set or is invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("linkage=info"));

        // A subscriber installed by the host application wins.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
