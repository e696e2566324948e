//! Raw status vocabularies → canonical status.
//!
//! Each backend kind reports health in its own words. One table per kind maps
//! the words it is known to use; everything else is fail-closed.
//!
//! ```text
//! Failed probe                   → Unhealthy
//! word in table                  → mapped value
//! word not in table              → Unhealthy
//! ```
//!
//! "Still starting" words map to Unknown so a booting service is not shown as down.

use crate::health::probe::ProbeResult;
use crate::health::state::{CanonicalStatus, ServiceKind};

use CanonicalStatus::{Healthy, Unhealthy, Unknown};

type Vocabulary = &'static [(&'static str, CanonicalStatus)];

const PROCESSOR: Vocabulary = &[("healthy", Healthy), ("error", Unhealthy)];

const LOG_INDEXER: Vocabulary = &[
    ("running", Healthy),
    ("healthy", Healthy),
    ("error", Unhealthy),
];

const LOG_GENERATOR: Vocabulary = &[
    ("running", Healthy),
    ("active", Healthy),
    ("development", Unknown),
    ("starting", Unknown),
    ("initializing", Unknown),
    ("error", Unhealthy),
];

fn vocabulary(kind: ServiceKind) -> Vocabulary {
    match kind {
        ServiceKind::Processor => PROCESSOR,
        ServiceKind::LogIndexer => LOG_INDEXER,
        ServiceKind::LogGenerator => LOG_GENERATOR,
    }
}

/// Map a raw status word for `kind`. Case and surrounding whitespace are ignored.
pub fn classify(kind: ServiceKind, raw: &str) -> CanonicalStatus {
    let raw = raw.trim();
    vocabulary(kind)
        .iter()
        .find(|(word, _)| word.eq_ignore_ascii_case(raw))
        .map(|(_, status)| *status)
        .unwrap_or(Unhealthy)
}

/// Canonical status for one probe outcome.
pub fn normalize(kind: ServiceKind, result: &ProbeResult) -> CanonicalStatus {
    match result {
        ProbeResult::Ok { payload, .. } => classify(kind, &payload.status),
        ProbeResult::Failed(_) => Unhealthy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::probe::{HealthPayload, ProbeError};
    use std::time::Duration;

    fn ok(status: &str) -> ProbeResult {
        ProbeResult::Ok {
            payload: HealthPayload::new(status),
            latency: Duration::from_millis(1),
        }
    }

    #[test]
    fn processor_healthy_is_healthy() {
        assert_eq!(normalize(ServiceKind::Processor, &ok("healthy")), Healthy);
    }

    #[test]
    fn processor_does_not_speak_the_generator_vocabulary() {
        assert_eq!(normalize(ServiceKind::Processor, &ok("running")), Unhealthy);
        assert_eq!(normalize(ServiceKind::Processor, &ok("development")), Unhealthy);
    }

    #[test]
    fn generator_development_is_unknown_not_unhealthy() {
        assert_eq!(normalize(ServiceKind::LogGenerator, &ok("development")), Unknown);
        assert_eq!(normalize(ServiceKind::LogGenerator, &ok("starting")), Unknown);
    }

    #[test]
    fn generator_running_and_active_are_healthy() {
        assert_eq!(normalize(ServiceKind::LogGenerator, &ok("running")), Healthy);
        assert_eq!(normalize(ServiceKind::LogGenerator, &ok("active")), Healthy);
    }

    #[test]
    fn indexer_running_is_healthy() {
        assert_eq!(normalize(ServiceKind::LogIndexer, &ok("running")), Healthy);
        assert_eq!(normalize(ServiceKind::LogIndexer, &ok("error")), Unhealthy);
    }

    #[test]
    fn unrecognised_words_fail_closed() {
        for kind in [ServiceKind::Processor, ServiceKind::LogIndexer, ServiceKind::LogGenerator] {
            assert_eq!(normalize(kind, &ok("degraded")), Unhealthy);
            assert_eq!(normalize(kind, &ok("")), Unhealthy);
        }
    }

    #[test]
    fn every_failure_reason_is_unhealthy() {
        let failures = [
            ProbeError::Transport("refused".into()),
            ProbeError::Timeout(5000),
            ProbeError::Protocol(500),
            ProbeError::Schema("missing field `status`".into()),
        ];
        for failure in failures {
            assert_eq!(
                normalize(ServiceKind::LogGenerator, &ProbeResult::Failed(failure)),
                Unhealthy
            );
        }
    }

    #[test]
    fn matching_ignores_case_and_padding() {
        assert_eq!(classify(ServiceKind::Processor, " Healthy\n"), Healthy);
        assert_eq!(classify(ServiceKind::LogGenerator, "DEVELOPMENT"), Unknown);
    }
}
