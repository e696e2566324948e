//! Single-shot health probes.
//!
//! # Responsibilities
//! - Issue exactly one GET against a backend's health surface
//! - Bound the exchange by the service's timeout
//! - Classify every failure (transport, timeout, status code, body shape)
//!
//! Retries are not done here; the next scheduler cycle is the retry.

use std::future::Future;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Method, Request, Uri};
use futures_util::StreamExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time;

use crate::config::ServiceConfig;
use crate::health::state::{ServiceIdentity, ServiceKind};

/// Health bodies larger than this are rejected.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

const PROBE_USER_AGENT: &str = concat!("status-aggregator/", env!("CARGO_PKG_VERSION"));

/// Body of a health response: a mandatory `status` plus whatever else the
/// backend chose to report (version, log files, downstream links...).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthPayload {
    pub status: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl HealthPayload {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            fields: serde_json::Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Parse a response body, rejecting anything but an object with a string `status`.
    pub fn from_slice(body: &[u8]) -> Result<Self, ProbeError> {
        serde_json::from_slice(body).map_err(|e| ProbeError::Schema(e.to_string()))
    }

    /// Kind-specific string field, if present.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }

    pub fn details(&self) -> Option<&str> {
        self.field_str("details")
    }

    pub fn version(&self) -> Option<&str> {
        self.field_str("version")
    }
}

/// Why a probe did not produce a usable payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Connection refused, DNS failure, reset mid-body...
    #[error("transport error: {0}")]
    Transport(String),

    /// No complete response within the budget (milliseconds).
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// Backend answered with a non-2xx status.
    #[error("non-success response: HTTP {0}")]
    Protocol(u16),

    /// Body did not match the health schema.
    #[error("malformed payload: {0}")]
    Schema(String),
}

impl ProbeError {
    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ProbeError::Transport(_) => "transport",
            ProbeError::Timeout(_) => "timeout",
            ProbeError::Protocol(_) => "protocol",
            ProbeError::Schema(_) => "schema",
        }
    }
}

/// Outcome of one probe attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    Ok { payload: HealthPayload, latency: Duration },
    Failed(ProbeError),
}

impl ProbeResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeResult::Ok { .. })
    }
}

/// Where and how long to probe one service.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub identity: ServiceIdentity,
    pub kind: ServiceKind,
    pub endpoint: String,
    pub timeout: Duration,
}

impl From<&ServiceConfig> for ProbeTarget {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            identity: config.identity.clone(),
            kind: config.kind,
            endpoint: config.endpoint_url.clone(),
            timeout: config.timeout(),
        }
    }
}

/// Something that can check one target.
///
/// Implementations must always resolve; the aggregator still wraps every call
/// in the target's timeout.
pub trait Prober: Send + Sync + 'static {
    fn probe(&self, target: &ProbeTarget) -> impl Future<Output = ProbeResult> + Send;
}

/// Plain-HTTP prober backed by a pooled hyper client.
#[derive(Clone)]
pub struct HttpProber {
    client: Client<HttpConnector, Body>,
}

impl HttpProber {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client }
    }

    async fn exchange(&self, endpoint: &str) -> Result<HealthPayload, ProbeError> {
        let uri: Uri = endpoint
            .parse()
            .map_err(|e| ProbeError::Transport(format!("invalid endpoint {}: {}", endpoint, e)))?;

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, PROBE_USER_AGENT)
            .body(Body::empty())
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Protocol(status.as_u16()));
        }

        let mut chunks = Body::new(response.into_body()).into_data_stream();
        let mut body = Vec::new();
        while let Some(chunk) = chunks.next().await {
            let chunk =
                chunk.map_err(|e| ProbeError::Transport(format!("failed to read body: {}", e)))?;
            if body.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(ProbeError::Schema(format!(
                    "body exceeds {} bytes",
                    MAX_BODY_BYTES
                )));
            }
            body.extend_from_slice(&chunk);
        }

        HealthPayload::from_slice(&body)
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

impl Prober for HttpProber {
    async fn probe(&self, target: &ProbeTarget) -> ProbeResult {
        let started = Instant::now();

        match time::timeout(target.timeout, self.exchange(&target.endpoint)).await {
            Ok(Ok(payload)) => ProbeResult::Ok {
                payload,
                latency: started.elapsed(),
            },
            Ok(Err(error)) => ProbeResult::Failed(error),
            Err(_) => ProbeResult::Failed(ProbeError::Timeout(
                u64::try_from(target.timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }
}
