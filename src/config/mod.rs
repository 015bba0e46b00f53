//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → loader.rs (PORT / HOST environment overrides)
//!     → command-line flags (main.rs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (immutable for the process lifetime)
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, resolve_config, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, ProxyConfig, UpstreamConfig};
pub use validation::{validate_config, ValidationError};
