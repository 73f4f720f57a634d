// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use access_cell::{AccessGate, Action};
use shared_models::error::AppError;
use shared_models::principal::Principal;

use crate::models::{AddSlotRequest, CreateDoctorRequest, DoctorError};
use crate::services::availability::AvailabilityService;
use crate::services::catalog::ScheduleCatalog;

pub struct DoctorCellState {
    pub catalog: ScheduleCatalog,
    pub availability: AvailabilityService,
    pub gate: AccessGate,
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

fn map_doctor_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
        DoctorError::DuplicateSlot(_) | DoctorError::Validation(_) => {
            AppError::Validation(e.to_string())
        }
        DoctorError::Storage(msg) => AppError::Storage(msg),
    }
}

/// Public listing: hidden profiles are filtered out.
pub async fn list_doctors_public(
    State(state): State<Arc<DoctorCellState>>,
) -> Result<Json<Value>, AppError> {
    let doctors = state
        .catalog
        .list_doctors(false)
        .await
        .map_err(map_doctor_error)?;
    Ok(Json(json!({ "doctors": doctors })))
}

pub async fn get_doctor_public(
    State(state): State<Arc<DoctorCellState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor = state
        .catalog
        .get_doctor(doctor_id)
        .await
        .map_err(map_doctor_error)?;
    Ok(Json(json!({ "doctor": doctor })))
}

/// Free slots for (doctor, date): the template minus non-cancelled bookings.
pub async fn get_available_slots(
    State(state): State<Arc<DoctorCellState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = state
        .availability
        .free_slots(doctor_id, query.date)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({
        "doctorId": doctor_id,
        "date": query.date,
        "availableSlots": slots,
    })))
}

/// Admin listing, inactive profiles included.
pub async fn list_doctors_admin(
    State(state): State<Arc<DoctorCellState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    let doctors = state
        .catalog
        .list_doctors(principal.is_admin())
        .await
        .map_err(map_doctor_error)?;
    Ok(Json(json!({ "doctors": doctors })))
}

pub async fn create_doctor(
    State(state): State<Arc<DoctorCellState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .gate
        .authorize(&principal, &Action::CreateDoctor)
        .require()?;

    let doctor = state
        .catalog
        .create_doctor(request)
        .await
        .map_err(map_doctor_error)?;
    Ok(Json(json!({ "success": true, "doctor": doctor })))
}

pub async fn delete_doctor(
    State(state): State<Arc<DoctorCellState>>,
    Extension(principal): Extension<Principal>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .gate
        .authorize(&principal, &Action::DeleteDoctor)
        .require()?;

    state
        .catalog
        .delete_doctor(doctor_id)
        .await
        .map_err(map_doctor_error)?;
    Ok(Json(json!({ "success": true })))
}

pub async fn add_slot(
    State(state): State<Arc<DoctorCellState>>,
    Extension(principal): Extension<Principal>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<AddSlotRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .gate
        .authorize(&principal, &Action::EditOwnSchedule { doctor_id })
        .require()?;

    let doctor = state
        .catalog
        .add_slot(doctor_id, request.label)
        .await
        .map_err(map_doctor_error)?;
    Ok(Json(json!({ "success": true, "doctor": doctor })))
}

pub async fn remove_slot(
    State(state): State<Arc<DoctorCellState>>,
    Extension(principal): Extension<Principal>,
    Path((doctor_id, label)): Path<(Uuid, String)>,
) -> Result<Json<Value>, AppError> {
    state
        .gate
        .authorize(&principal, &Action::EditOwnSchedule { doctor_id })
        .require()?;

    let doctor = state
        .catalog
        .remove_slot(doctor_id, &label)
        .await
        .map_err(map_doctor_error)?;
    Ok(Json(json!({ "success": true, "doctor": doctor })))
}

pub async fn toggle_active(
    State(state): State<Arc<DoctorCellState>>,
    Extension(principal): Extension<Principal>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .gate
        .authorize(&principal, &Action::EditOwnSchedule { doctor_id })
        .require()?;

    let doctor = state
        .catalog
        .toggle_active(doctor_id)
        .await
        .map_err(map_doctor_error)?;
    Ok(Json(json!({ "success": true, "doctor": doctor })))
}
