//! Relay subsystem: everything between the inbound request and the response.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → handler.rs (read `u`, compute proxy base)
//!     → cookies.rs (stored cookie for the target host)
//!     → upstream.rs (single GET, Cookie header only)
//!     → cookies.rs (store any Set-Cookie, last write wins)
//!     → Content-Type contains text/html?
//!         yes → rewrite.rs (absolute href/src → proxy URLs) → 200 text/html
//!         no  → raw bytes with the origin's Content-Type → 200
//! ```
//!
//! The origin's status code is never forwarded.

pub mod cookies;
pub mod handler;
pub mod rewrite;
pub mod upstream;

pub use cookies::CookieStore;
pub use handler::relay_handler;
pub use rewrite::rewrite_links;
pub use upstream::{UpstreamClient, UpstreamResponse};
