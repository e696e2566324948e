//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Probe (probe.rs):
//!     One bounded GET per service
//!     → ProbeResult (payload + latency, or classified failure)
//!
//! Normalizer (normalize.rs):
//!     ProbeResult + ServiceKind
//!     → CanonicalStatus (per-kind vocabulary, fail-closed)
//!
//! State (state.rs):
//!     CanonicalStatus + ProbeResult
//!     → StatusRecord (status, detail, failure streak)
//! ```
//!
//! # Design Decisions
//! - Probes never retry and never panic their caller; errors become values
//! - Vocabularies are data, not string matching scattered around callers
//! - Health state is per-service; one failure never touches a sibling

pub mod normalize;
pub mod probe;
pub mod state;

pub use normalize::normalize;
pub use probe::{HealthPayload, HttpProber, ProbeError, ProbeResult, ProbeTarget, Prober};
pub use state::{CanonicalStatus, ServiceIdentity, ServiceKind, StatusRecord};
