//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by outcome and status
//! - `relay_request_duration_seconds` (histogram): handler latency by outcome
//! - `relay_rewrites_total` (counter): HTML documents rewritten
//! - `relay_cookie_store_entries` (gauge): hosts with a stored cookie
//!
//! Recording is a no-op until an exporter is installed, so the relay code
//! records unconditionally.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(outcome: &'static str, status: u16, start_time: Instant) {
    counter!("relay_requests_total", "outcome" => outcome, "status" => status.to_string())
        .increment(1);
    histogram!("relay_request_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_rewrite() {
    counter!("relay_rewrites_total").increment(1);
}

pub fn record_cookie_store_size(entries: usize) {
    gauge!("relay_cookie_store_entries").set(entries as f64);
}
