//! # Telemetry Module
//!
//! Process-wide `tracing` subscriber initialization. Filtering follows
//! `RUST_LOG` (defaulting to `info`); set `MULLIGAN_LOG_FORMAT=json` for
//! structured JSON output instead of the human-readable formatter.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global tracing subscriber. Safe to call more than once;
/// subsequent calls are no-ops, so library tests and embedding applications
/// can both call it unconditionally.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json = std::env::var("MULLIGAN_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        if json {
            let _ = builder.json().try_init();
        } else {
            let _ = builder.try_init();
        }
    });
}
