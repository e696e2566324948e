//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dashboard.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::health::state::{ServiceIdentity, ServiceKind};

/// Root configuration for the status aggregator.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Polling cadence.
    pub scheduler: SchedulerConfig,

    /// Snapshot API listener.
    pub api: ApiConfig,

    /// Local capture-mode toggle.
    pub capture: CaptureConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Monitored backends, in display order.
    pub services: Vec<ServiceConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            api: ApiConfig::default(),
            capture: CaptureConfig::default(),
            observability: ObservabilityConfig::default(),
            services: default_services(),
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Time between cycle starts in milliseconds.
    pub interval_ms: u64,
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

/// HTTP API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:8090").
    pub bind_address: String,

    /// Per-request timeout in seconds (does not apply to open streams).
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8090".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Capture-mode toggle configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Initial toggle position.
    pub enabled: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One monitored backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Unique, stable identity (e.g. "processor").
    pub identity: ServiceIdentity,

    /// Vocabulary family of the backend.
    pub kind: ServiceKind,

    /// Absolute URL of the health surface.
    pub endpoint_url: String,

    /// Probe timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ServiceConfig {
    pub fn new(identity: &str, kind: ServiceKind, endpoint_url: &str) -> Self {
        Self {
            identity: identity.into(),
            kind,
            endpoint_url: endpoint_url.to_string(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig::new("processor", ServiceKind::Processor, "http://processor:8001/health"),
        ServiceConfig::new(
            "logIndexer",
            ServiceKind::LogIndexer,
            "http://frontend:3000/api/splunk/health",
        ),
        ServiceConfig::new(
            "logGenerator",
            ServiceKind::LogGenerator,
            "http://frontend:3000/api/zeek/health",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_three_backends() {
        let config = DashboardConfig::default();
        let kinds: Vec<_> = config.services.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![ServiceKind::Processor, ServiceKind::LogIndexer, ServiceKind::LogGenerator]
        );
        assert_eq!(config.scheduler.interval(), Duration::from_secs(5));
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [[services]]
            identity = "processor"
            kind = "processor"
            endpoint_url = "http://127.0.0.1:8001/health"
            "#,
        )
        .unwrap();

        assert_eq!(config.services.len(), 1);
        assert_eq!(config.services[0].timeout(), Duration::from_millis(5000));
        assert_eq!(config.api.bind_address, "0.0.0.0:8090");
        assert!(!config.capture.enabled);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<DashboardConfig, _> = toml::from_str(
            r#"
            [[services]]
            identity = "x"
            kind = "database"
            endpoint_url = "http://127.0.0.1/health"
            "#,
        );
        assert!(result.is_err());
    }
}
