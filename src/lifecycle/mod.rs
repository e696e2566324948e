//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → trigger → scheduler stops → API drains → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → resolve wait_for_signal()
//!     API task exit  → end the wait early (until_signal_or_exit)
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop polling first, then stop serving snapshots
//! - In-flight cycles finish but publish nothing

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::{until_signal_or_exit, wait_for_signal};
