//! Configuration loading: defaults, TOML file, then environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the listen port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable carrying the bind host.
pub const HOST_ENV: &str = "HOST";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file into a configuration without validating it.
pub fn read_config_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let config = read_config_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay `PORT` and `HOST` taken from `lookup` onto `config`.
///
/// `lookup` is usually `std::env::var(..).ok()`; taking a closure keeps tests
/// away from the process environment.
pub fn apply_env_overrides<F>(mut config: ProxyConfig, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(PORT_ENV) {
        config.listener.port = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            name: PORT_ENV,
            value: raw.clone(),
        })?;
    }

    if let Some(host) = lookup(HOST_ENV) {
        if !host.trim().is_empty() {
            config.listener.host = host;
        }
    }

    Ok(config)
}

/// Build the effective configuration: defaults or `path`, then the process
/// environment. The result is not yet validated so callers can still apply
/// command-line overrides.
pub fn resolve_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let base = match path {
        Some(path) => read_config_file(path)?,
        None => ProxyConfig::default(),
    };
    apply_env_overrides(base, |name| std::env::var(name).ok())
}
