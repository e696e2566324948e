//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check identities are present and unique
//! - Validate value ranges (timeouts, interval) and addresses
//! - Check every endpoint is an absolute http URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DashboardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::DashboardConfig;

/// Upper bound on a single probe's timeout.
pub const MAX_TIMEOUT_MS: u64 = 60_000;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no services configured")]
    NoServices,

    #[error("service #{index} has an empty identity")]
    EmptyIdentity { index: usize },

    #[error("duplicate service identity '{0}'")]
    DuplicateIdentity(String),

    #[error("service '{identity}' has invalid endpoint '{url}': {reason}")]
    InvalidEndpoint {
        identity: String,
        url: String,
        reason: String,
    },

    #[error("service '{identity}' timeout {timeout_ms}ms outside 1..=60000")]
    InvalidTimeout { identity: String, timeout_ms: u64 },

    #[error("scheduler interval must be greater than zero")]
    ZeroInterval,

    #[error("{field} '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    let mut seen = HashSet::new();
    for (index, service) in config.services.iter().enumerate() {
        let identity = service.identity.as_str();
        if identity.trim().is_empty() {
            errors.push(ValidationError::EmptyIdentity { index });
        } else if !seen.insert(identity) {
            errors.push(ValidationError::DuplicateIdentity(identity.to_string()));
        }

        if let Err(reason) = check_endpoint(&service.endpoint_url) {
            errors.push(ValidationError::InvalidEndpoint {
                identity: identity.to_string(),
                url: service.endpoint_url.clone(),
                reason,
            });
        }

        if service.timeout_ms == 0 || service.timeout_ms > MAX_TIMEOUT_MS {
            errors.push(ValidationError::InvalidTimeout {
                identity: identity.to_string(),
                timeout_ms: service.timeout_ms,
            });
        }
    }

    if config.scheduler.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    check_address("api.bind_address", &config.api.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
