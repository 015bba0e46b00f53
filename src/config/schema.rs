//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Outbound client settings.
    pub upstream: UpstreamConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Port 0 asks the OS for an ephemeral port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` form, suitable for logging and `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Follow upstream redirects before answering the caller.
    pub follow_redirects: bool,

    /// Redirect hop limit when `follow_redirects` is on.
    pub max_redirects: usize,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` for outbound requests.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            follow_redirects: true,
            max_redirects: 10,
            use_system_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
