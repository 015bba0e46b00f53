//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID and trace layers)
//!     → request.rs (request ID, `u` parameter, proxy base)
//!     → relay handler (see crate::relay)
//!     → response.rs (HTML or passthrough response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
