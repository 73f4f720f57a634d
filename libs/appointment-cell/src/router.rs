use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use access_cell::principal_middleware;
use shared_store::DocumentStore;

use crate::handlers::{self, AppointmentCellState};

pub fn appointment_routes(state: Arc<AppointmentCellState>, store: Arc<DocumentStore>) -> Router {
    // Every appointment route needs a resolved principal
    Router::new()
        .route(
            "/",
            post(handlers::book_appointment).get(handlers::list_appointments),
        )
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/status", patch(handlers::set_status))
        .layer(middleware::from_fn_with_state(store, principal_middleware))
        .with_state(state)
}
