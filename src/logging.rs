//! Diagnostic logging.
//!
//! Logs go to stderr so that `--output json` on stdout stays parseable.
//! `CADENCE_LOG` takes precedence over the configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "CADENCE_LOG";

/// Build the filter from `CADENCE_LOG`, falling back to `default_level`.
#[must_use]
pub fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(filter(default_level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
