//! Status aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! Scheduler tick (scheduler.rs)
//!     → engine.rs fans out one probe per service (concurrent, bounded)
//!     → health::normalize per result
//!     → merge into the owned status table
//!     → signals.rs recomputes derived signals
//!     → snapshot.rs publishes an immutable Snapshot
//!
//! Readers (API, CLI, tests):
//!     SnapshotStore::current()    (pull)
//!     SnapshotStore::subscribe()  (push)
//! ```
//!
//! # Design Decisions
//! - Single writer: only the engine's merge step touches the table
//! - Readers get `Arc<Snapshot>`, never a reference into the table
//! - Derived signals are computed after every result is merged

pub mod capture;
pub mod engine;
pub mod scheduler;
pub mod signals;
pub mod snapshot;

pub use capture::CaptureToggle;
pub use engine::Aggregator;
pub use scheduler::{Scheduler, SchedulerError, SchedulerState};
pub use signals::{CaptureState, DerivedSignals};
pub use snapshot::{Snapshot, SnapshotStore};
