use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use access_cell::principal_middleware;
use shared_store::DocumentStore;

use crate::handlers::{self, DoctorCellState};

pub fn doctor_routes(state: Arc<DoctorCellState>, store: Arc<DocumentStore>) -> Router {
    // Public routes (no principal required)
    let public_routes = Router::new()
        .route("/", get(handlers::list_doctors_public))
        .route("/{doctor_id}", get(handlers::get_doctor_public))
        .route("/{doctor_id}/available-slots", get(handlers::get_available_slots));

    // Protected routes (resolved principal required)
    let protected_routes = Router::new()
        .route("/", post(handlers::create_doctor))
        .route("/all", get(handlers::list_doctors_admin))
        .route("/{doctor_id}", delete(handlers::delete_doctor))
        .route("/{doctor_id}/slots", post(handlers::add_slot))
        .route("/{doctor_id}/slots/{label}", delete(handlers::remove_slot))
        .route("/{doctor_id}/toggle-active", patch(handlers::toggle_active))
        .layer(middleware::from_fn_with_state(store, principal_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
