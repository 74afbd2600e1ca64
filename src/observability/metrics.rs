//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by method, status, mount
//! - `edge_request_duration_seconds` (histogram): latency distribution
//! - `edge_rejected_bodies_total` (counter): bodies refused by the parser
//!
//! Without an installed recorder these calls are no-ops, so tests and the
//! default configuration pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, mount: &'static str, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    counter!(
        "edge_requests_total",
        "method" => method.clone(),
        "status" => status.clone(),
        "mount" => mount
    )
    .increment(1);
    histogram!(
        "edge_request_duration_seconds",
        "method" => method,
        "status" => status,
        "mount" => mount
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_rejected_body(reason: &'static str) {
    counter!("edge_rejected_bodies_total", "reason" => reason).increment(1);
}
