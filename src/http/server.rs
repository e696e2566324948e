//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve until the shutdown signal fires

use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::aggregator::{CaptureToggle, SnapshotStore};
use crate::config::ApiConfig;
use crate::http::handlers::*;
use crate::http::websocket::stream_handler;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SnapshotStore,
    pub capture: CaptureToggle,
}

/// Read-side HTTP API over the aggregator's snapshots.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    pub fn new(config: &ApiConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ApiConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(healthz))
            .route("/api/status", get(get_status))
            .route("/api/status/{identity}", get(get_service))
            .route("/api/capture", get(get_capture).put(put_capture))
            .route("/api/stream", get(stream_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Router without a listener, for in-process use.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Snapshot API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Snapshot API shutting down");
            })
            .await?;

        tracing::info!("Snapshot API stopped");
        Ok(())
    }
}
