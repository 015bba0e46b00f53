//! Configuration validation.
//!
//! Serde handles the syntax; this pass checks values. All problems are
//! reported together rather than stopping at the first one.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// Upper bound accepted for `upstream.max_redirects`.
pub const MAX_REDIRECT_LIMIT: usize = 20;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.host must not be empty")]
    EmptyHost,

    #[error("upstream.max_redirects {value} exceeds the limit of {limit}")]
    TooManyRedirects { value: usize, limit: usize },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a configuration, returning every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    if config.upstream.follow_redirects && config.upstream.max_redirects > MAX_REDIRECT_LIMIT {
        errors.push(ValidationError::TooManyRedirects {
            value: config.upstream.max_redirects,
            limit: MAX_REDIRECT_LIMIT,
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
