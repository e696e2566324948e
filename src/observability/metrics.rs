//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dashboard_service_status` (gauge): 1=healthy, 0=unknown, -1=unhealthy
//! - `dashboard_probe_duration_seconds` (histogram): successful probe latency
//! - `dashboard_probe_failures_total` (counter): failed probes by reason
//! - `dashboard_cycles_total` (counter): published cycles
//! - `dashboard_cycle_duration_seconds` (histogram): full fan-out + merge time

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::probe::ProbeResult;
use crate::health::state::{CanonicalStatus, ServiceIdentity, ServiceKind};

/// Install the Prometheus recorder with its own HTTP listener.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(
            address = %addr,
            error = %e,
            "Failed to install metrics exporter"
        ),
    }
}

pub fn record_service_status(identity: &ServiceIdentity, status: CanonicalStatus) {
    gauge!("dashboard_service_status", "service" => identity.to_string()).set(status.gauge_value());
}

pub fn record_probe(identity: &ServiceIdentity, kind: ServiceKind, result: &ProbeResult) {
    match result {
        ProbeResult::Ok { latency, .. } => {
            histogram!(
                "dashboard_probe_duration_seconds",
                "service" => identity.to_string(),
                "kind" => kind.as_str()
            )
            .record(latency.as_secs_f64());
        }
        ProbeResult::Failed(error) => {
            counter!(
                "dashboard_probe_failures_total",
                "service" => identity.to_string(),
                "reason" => error.reason()
            )
            .increment(1);
        }
    }
}

pub fn record_cycle(started: Instant) {
    counter!("dashboard_cycles_total").increment(1);
    histogram!("dashboard_cycle_duration_seconds").record(started.elapsed().as_secs_f64());
}
