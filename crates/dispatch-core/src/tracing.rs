//! Subscriber setup for binaries and tests embedding the engine.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

static INIT: OnceLock<bool> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` overrides `config.filter`.
///
/// Returns `true` if this call (or an earlier one) installed our
/// subscriber, `false` if another subscriber was already set globally.
/// Calling it again is a no-op.
pub fn init(config: &LoggingConfig) -> bool {
    *INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(filter);
        let installed = if config.json {
            registry.with(fmt::layer().json()).try_init()
        } else {
            registry.with(fmt::layer()).try_init()
        };
        installed.is_ok()
    })
}
