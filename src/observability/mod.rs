//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Aggregator, scheduler and API produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`identity`, `kind`, `reason`) on every probe event
//! - Metrics are cheap and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
