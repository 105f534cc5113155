//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devserver_proxy_requests_total` (counter): proxied requests by method, status, prefix
//! - `devserver_proxy_request_duration_seconds` (histogram): upstream latency
//! - `devserver_spa_fallbacks_total` (counter): index.html fallbacks by route outcome
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_proxy_request(method: &str, status: u16, prefix: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("prefix", prefix.to_string()),
    ];
    counter!("devserver_proxy_requests_total", &labels).increment(1);
    histogram!("devserver_proxy_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_spa_fallback(outcome: &str) {
    counter!("devserver_spa_fallbacks_total", "outcome" => outcome.to_string()).increment(1);
}
