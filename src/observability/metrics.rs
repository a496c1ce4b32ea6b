//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): bearer checks by outcome
//! - `tool_calls_total` (counter): tool invocations by tool, outcome
//! - `tool_call_duration_seconds` (histogram): tool latency
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_auth_decision(outcome: &'static str) {
    ::metrics::counter!("gate_decisions_total", "outcome" => outcome).increment(1);
}

pub fn record_tool_call(tool: &str, outcome: &'static str, start: Instant) {
    ::metrics::counter!("tool_calls_total", "tool" => tool.to_string(), "outcome" => outcome)
        .increment(1);
    ::metrics::histogram!("tool_call_duration_seconds", "tool" => tool.to_string())
        .record(start.elapsed().as_secs_f64());
}
