//! Per-service status state.
//!
//! # States
//! - Unknown: never probed, or the backend reports it is still starting
//! - Healthy: last probe succeeded with a recognised "up" value
//! - Unhealthy: last probe failed, or reported anything else
//!
//! # State Transitions
//! ```text
//! Unknown → Healthy | Unhealthy | Unknown   (every completed probe)
//! Healthy ←→ Unhealthy                      (every completed probe)
//! * → Unknown                               (aggregator reset only)
//! ```
//!
//! # Design Decisions
//! - No hysteresis: the latest probe wins, the next cycle is the retry
//! - Consecutive failures are tracked for diagnostics but never gate state

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::health::probe::{HealthPayload, ProbeError, ProbeResult};

/// Stable key naming one monitored backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ServiceIdentity(String);

impl ServiceIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceIdentity {
    fn from(identity: &str) -> Self {
        Self::new(identity)
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend family, selecting which raw status vocabulary applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Packet/event processor.
    Processor,
    /// Log indexing service.
    LogIndexer,
    /// Network log generator (capture sensor).
    LogGenerator,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Processor => "processor",
            ServiceKind::LogIndexer => "log_indexer",
            ServiceKind::LogGenerator => "log_generator",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized health of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    Healthy,
    Unhealthy,
    Unknown,
}

impl CanonicalStatus {
    /// Gauge encoding used by the metrics exporter.
    pub fn gauge_value(&self) -> f64 {
        match self {
            CanonicalStatus::Healthy => 1.0,
            CanonicalStatus::Unknown => 0.0,
            CanonicalStatus::Unhealthy => -1.0,
        }
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CanonicalStatus::Healthy => "healthy",
            CanonicalStatus::Unhealthy => "unhealthy",
            CanonicalStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Everything the dashboard knows about one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRecord {
    pub identity: ServiceIdentity,
    pub kind: ServiceKind,
    pub status: CanonicalStatus,
    /// Human-readable outcome of the latest probe.
    pub last_raw_detail: Option<String>,
    /// Unix milliseconds of the latest merge touching this record.
    pub last_updated_at: Option<u64>,
    pub consecutive_failures: u32,
    pub last_latency_ms: Option<u64>,
    /// Body of the latest successful probe.
    pub last_payload: Option<HealthPayload>,
}

impl StatusRecord {
    pub fn new(identity: ServiceIdentity, kind: ServiceKind) -> Self {
        Self {
            identity,
            kind,
            status: CanonicalStatus::Unknown,
            last_raw_detail: None,
            last_updated_at: None,
            consecutive_failures: 0,
            last_latency_ms: None,
            last_payload: None,
        }
    }

    /// Fold one probe outcome into the record.
    pub fn apply(&mut self, status: CanonicalStatus, result: &ProbeResult, at_millis: u64) {
        self.status = status;
        self.last_updated_at = Some(at_millis);

        match result {
            ProbeResult::Ok { payload, latency } => {
                self.consecutive_failures = 0;
                self.last_latency_ms = Some(duration_millis(*latency));
                self.last_raw_detail = Some(describe_payload(payload));
                self.last_payload = Some(payload.clone());
            }
            ProbeResult::Failed(error) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                self.last_latency_ms = None;
                self.last_raw_detail = Some(describe_failure(error));
            }
        }
    }

    /// Return to the never-probed state.
    pub fn reset(&mut self) {
        *self = Self::new(self.identity.clone(), self.kind);
    }
}

fn describe_payload(payload: &HealthPayload) -> String {
    match payload.details() {
        Some(details) => format!("{}: {}", payload.status, details),
        None => payload.status.clone(),
    }
}

fn describe_failure(error: &ProbeError) -> String {
    error.to_string()
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
