//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(config: &ObservabilityConfig) -> String {
    let level = config.log_level.to_ascii_lowercase();
    format!("relay_proxy={level},tower_http={level}")
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(config: &ObservabilityConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(config).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
