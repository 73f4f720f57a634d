use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers::{self, SyncCellState};

pub fn sync_routes(state: Arc<SyncCellState>) -> Router {
    // Read-only views, no principal required
    Router::new()
        .route("/appointment-rows", get(handlers::get_appointment_rows))
        .route("/{collection}", get(handlers::get_snapshot))
        .route("/{collection}/ws", get(handlers::stream_snapshots))
        .with_state(state)
}
