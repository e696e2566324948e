//! Snapshot API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → handlers.rs (pull: status, single service, capture toggle)
//!     → websocket.rs (push: one frame per published snapshot)
//! ```
//!
//! The API only reads snapshots; the capture toggle is its one write.

pub mod handlers;
pub mod server;
pub mod websocket;

pub use server::{ApiServer, AppState};
