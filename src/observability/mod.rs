//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay + http subsystems produce:
//!     → logging.rs (structured tracing events, request ID in fields)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → optional Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
