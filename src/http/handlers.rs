use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::aggregator::Snapshot;
use crate::health::state::StatusRecord;
use crate::http::server::AppState;

/// This service's own health, in the processor vocabulary.
#[derive(Serialize)]
pub struct SelfHealth {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureBody {
    pub enabled: bool,
}

pub async fn healthz() -> Json<SelfHealth> {
    Json(SelfHealth {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn get_status(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.store.current().as_ref().clone())
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<Json<StatusRecord>, (StatusCode, Json<serde_json::Value>)> {
    let snapshot = state.store.current();
    match snapshot.record(&identity) {
        Some(record) => Ok(Json(record.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("unknown service '{}'", identity) })),
        )),
    }
}

pub async fn get_capture(State(state): State<AppState>) -> Json<CaptureBody> {
    Json(CaptureBody {
        enabled: state.capture.is_enabled(),
    })
}

pub async fn put_capture(
    State(state): State<AppState>,
    Json(body): Json<CaptureBody>,
) -> Json<CaptureBody> {
    let previous = state.capture.set(body.enabled);
    if previous != body.enabled {
        tracing::info!(enabled = body.enabled, "Capture mode toggled");
    }
    Json(body)
}
