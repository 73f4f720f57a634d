// libs/sync-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_models::error::AppError;
use shared_store::Collection;

use crate::services::hub::SyncHub;
use crate::views;

pub struct SyncCellState {
    pub hub: Arc<SyncHub>,
}

fn parse_collection(raw: &str) -> Result<Collection, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("Unknown collection {raw:?}")))
}

/// One-shot snapshot of a collection.
pub async fn get_snapshot(
    State(state): State<Arc<SyncCellState>>,
    Path(collection): Path<String>,
) -> Result<Json<Value>, AppError> {
    let collection = parse_collection(&collection)?;
    let snapshot = state.hub.snapshot(collection).await;
    Ok(Json(json!(snapshot)))
}

/// Appointments joined with doctor names, for list views that would
/// otherwise fetch two snapshots and join client-side.
pub async fn get_appointment_rows(
    State(state): State<Arc<SyncCellState>>,
) -> Result<Json<Value>, AppError> {
    let appointments = state.hub.snapshot(Collection::Appointments).await;
    let doctors = state.hub.snapshot(Collection::Doctors).await;
    let rows = views::appointment_rows(&appointments.documents, &doctors.documents);
    Ok(Json(json!({ "appointments": rows })))
}

/// Live snapshot stream: the current snapshot immediately, then one full
/// snapshot per change until the client hangs up.
pub async fn stream_snapshots(
    State(state): State<Arc<SyncCellState>>,
    Path(collection): Path<String>,
    upgrade: WebSocketUpgrade,
) -> Result<Response, AppError> {
    let collection = parse_collection(&collection)?;
    Ok(upgrade.on_upgrade(move |socket| pump_snapshots(socket, state, collection)))
}

async fn pump_snapshots(mut socket: WebSocket, state: Arc<SyncCellState>, collection: Collection) {
    let mut subscription = state.hub.subscribe(collection).await;
    debug!("websocket observer joined {} feed", collection);

    loop {
        let snapshot = subscription.recv().await;
        let payload = match serde_json::to_string(&snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("failed to serialize {} snapshot: {}", collection, e);
                continue;
            }
        };
        if socket.send(Message::Text(payload.into())).await.is_err() {
            // Client went away; dropping the subscription releases the feed.
            debug!("websocket observer left {} feed", collection);
            break;
        }
    }
}
