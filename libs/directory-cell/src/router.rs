use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use access_cell::principal_middleware;
use shared_store::DocumentStore;

use crate::handlers::{self, DirectoryCellState};

pub fn hospital_routes(state: Arc<DirectoryCellState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_hospitals))
        .with_state(state)
}

pub fn brand_routes(state: Arc<DirectoryCellState>, store: Arc<DocumentStore>) -> Router {
    let public_routes = Router::new().route("/", get(handlers::list_brands));

    let protected_routes = Router::new()
        .route("/", post(handlers::add_brand))
        .route("/{brand_id}", delete(handlers::remove_brand))
        .layer(middleware::from_fn_with_state(store, principal_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
