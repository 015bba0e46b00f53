//! Link-rewriting HTTP relay proxy.
//!
//! Fetches the URL given in the `u` query parameter, replays cookies per
//! upstream host, and rewrites absolute links in HTML so that following them
//! goes back through the proxy.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::schema::ProxyConfig;
pub use error::{RelayError, RelayResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{rewrite_links, CookieStore};
