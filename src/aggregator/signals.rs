//! Derived signals.
//!
//! Pure functions of the merged table (and the capture toggle). Never probed,
//! recomputed from scratch every cycle.

use serde::Serialize;

use crate::health::state::{CanonicalStatus, ServiceKind, StatusRecord};

/// Value of the processor's `splunk` field when its indexer link is up.
const INDEXER_CONNECTED: &str = "connected";

/// Capture pipeline as the operator sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    /// Toggle is off.
    Off,
    /// Toggle is on, but the log generator is not healthy (yet).
    Armed,
    /// Toggle is on and the log generator is healthy.
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedSignals {
    /// The log generator is producing logs.
    pub live_capture_active: bool,
    /// The processor reports a working link to the log indexer.
    pub indexer_reachable: bool,
    pub overall: CanonicalStatus,
    pub capture: CaptureState,
}

/// Compute every signal from one consistent set of records.
pub fn derive(records: &[StatusRecord], capture_enabled: bool) -> DerivedSignals {
    let live_capture_active = any_healthy(records, ServiceKind::LogGenerator);

    let indexer_reachable = records.iter().any(|r| {
        r.kind == ServiceKind::Processor
            && r.status == CanonicalStatus::Healthy
            && r
                .last_payload
                .as_ref()
                .and_then(|p| p.field_str("splunk"))
                .is_some_and(|link| link == INDEXER_CONNECTED)
    });

    let capture = match (capture_enabled, live_capture_active) {
        (false, _) => CaptureState::Off,
        (true, false) => CaptureState::Armed,
        (true, true) => CaptureState::Live,
    };

    DerivedSignals {
        live_capture_active,
        indexer_reachable,
        overall: overall(records),
        capture,
    }
}

fn any_healthy(records: &[StatusRecord], kind: ServiceKind) -> bool {
    records
        .iter()
        .any(|r| r.kind == kind && r.status == CanonicalStatus::Healthy)
}

fn overall(records: &[StatusRecord]) -> CanonicalStatus {
    if records.is_empty() {
        return CanonicalStatus::Unknown;
    }
    if records.iter().any(|r| r.status == CanonicalStatus::Unhealthy) {
        CanonicalStatus::Unhealthy
    } else if records.iter().any(|r| r.status == CanonicalStatus::Unknown) {
        CanonicalStatus::Unknown
    } else {
        CanonicalStatus::Healthy
    }
}
