//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devproxy_requests_total` (counter): requests by method, status, and
//!   routing outcome (rule name or `static`)
//! - `devproxy_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - The exporter is opt-in; a dev tool should not open extra ports by
//!   default
//! - Label cardinality stays bounded: outcomes are rule names, not paths

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics exporter"),
    }
}

/// Record one handled request.
///
/// `outcome` is the matched rule name, or `static` for locally served
/// requests.
pub fn record_request(method: &str, status: u16, outcome: &str, started: Instant) {
    counter!(
        "devproxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        "devproxy_request_duration_seconds",
        "method" => method.to_string(),
        "outcome" => outcome.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}
