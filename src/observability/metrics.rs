//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mock_requests_total` (counter): requests by method and outcome
//! - `mock_match_duration_seconds` (histogram): route lookup latency
//! - `mock_routes_loaded` (gauge): routes in the current snapshot
//! - `mock_route_reloads_total` (counter): reloads by result

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request and how long its route lookup took.
pub fn record_request(method: &str, matched: bool, lookup_start: Instant) {
    let outcome = if matched { "matched" } else { "fallthrough" };
    counter!(
        "mock_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("mock_match_duration_seconds").record(lookup_start.elapsed().as_secs_f64());
}

pub fn record_routes_loaded(count: usize) {
    gauge!("mock_routes_loaded").set(count as f64);
}

pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("mock_route_reloads_total", "result" => result).increment(1);
}
