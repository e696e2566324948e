//! Snapshot push over WebSocket.
//!
//! # Data Flow
//! ```text
//! SnapshotStore (watch) ──── JSON text frame per snapshot ────→ Client
//! ```
//!
//! # Design Decisions
//! - First frame is the current snapshot, so clients never start empty
//! - Latest value wins: a slow client skips intermediate snapshots
//! - Client messages other than Close are ignored

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::watch;

use crate::aggregator::Snapshot;
use crate::http::server::AppState;

pub async fn stream_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let updates = state.store.subscribe();
    ws.on_upgrade(move |socket| stream_snapshots(socket, updates))
}

async fn stream_snapshots(socket: WebSocket, mut updates: watch::Receiver<Arc<Snapshot>>) {
    let (mut sink, mut incoming) = socket.split();

    'stream: loop {
        let snapshot = Arc::clone(&updates.borrow_and_update());
        let frame = match serde_json::to_string(snapshot.as_ref()) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode snapshot");
                break;
            }
        };
        if sink.send(Message::Text(frame.into())).await.is_err() {
            break;
        }

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break 'stream;
                    }
                    break;
                }
                message = incoming.next() => match message {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break 'stream,
                    Some(Ok(_)) => {}
                },
            }
        }
    }

    tracing::debug!("Snapshot stream closed");
}
