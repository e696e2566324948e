//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DashboardConfig (validated, immutable)
//!     → handed to the aggregator, scheduler and API at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the service set never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ApiConfig, CaptureConfig, DashboardConfig, ObservabilityConfig, SchedulerConfig,
    ServiceConfig,
};
pub use validation::ValidationError;
