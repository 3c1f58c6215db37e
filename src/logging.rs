//! Logging setup for programs embedding dynamo-control.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "DYNAMO_CONTROL_LOG";

/// Install a global `tracing` subscriber.
///
/// The filter comes from `DYNAMO_CONTROL_LOG` and defaults to "info". Fails if
/// a global subscriber is already set, which callers may ignore.
pub fn init_logging() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
