//! Service status aggregation for the monitoring dashboard.

pub mod aggregator;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use aggregator::{Aggregator, Scheduler, Snapshot, SnapshotStore};
pub use config::DashboardConfig;
pub use http::ApiServer;
pub use lifecycle::Shutdown;
