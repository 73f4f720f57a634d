// libs/directory-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use access_cell::{AccessGate, Action};
use shared_models::error::AppError;
use shared_models::principal::Principal;

use crate::models::{AddBrandRequest, DirectoryError};
use crate::services::DirectoryService;

pub struct DirectoryCellState {
    pub directory: DirectoryService,
    pub gate: AccessGate,
}

fn map_directory_error(e: DirectoryError) -> AppError {
    match e {
        DirectoryError::BrandNotFound => AppError::NotFound("Brand not found".to_string()),
        DirectoryError::Validation(_) => AppError::Validation(e.to_string()),
        DirectoryError::Storage(msg) => AppError::Storage(msg),
    }
}

pub async fn list_hospitals(
    State(state): State<Arc<DirectoryCellState>>,
) -> Result<Json<Value>, AppError> {
    let hospitals = state
        .directory
        .list_hospitals()
        .await
        .map_err(map_directory_error)?;
    Ok(Json(json!({ "hospitals": hospitals })))
}

pub async fn list_brands(
    State(state): State<Arc<DirectoryCellState>>,
) -> Result<Json<Value>, AppError> {
    let brands = state
        .directory
        .list_brands()
        .await
        .map_err(map_directory_error)?;
    Ok(Json(json!({ "brands": brands })))
}

pub async fn add_brand(
    State(state): State<Arc<DirectoryCellState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<AddBrandRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .gate
        .authorize(&principal, &Action::ManageBrands)
        .require()?;

    let brand = state
        .directory
        .add_brand(request)
        .await
        .map_err(map_directory_error)?;
    Ok(Json(json!({ "success": true, "brand": brand })))
}

pub async fn remove_brand(
    State(state): State<Arc<DirectoryCellState>>,
    Extension(principal): Extension<Principal>,
    Path(brand_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .gate
        .authorize(&principal, &Action::ManageBrands)
        .require()?;

    state
        .directory
        .remove_brand(brand_id)
        .await
        .map_err(map_directory_error)?;
    Ok(Json(json!({ "success": true })))
}
