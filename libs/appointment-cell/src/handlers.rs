// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::principal::Principal;

use crate::models::{
    AppointmentError, AppointmentQuery, AppointmentStatus, BookAppointmentRequest,
    SetStatusRequest,
};
use crate::services::ledger::AppointmentLedger;

pub struct AppointmentCellState {
    pub ledger: AppointmentLedger,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    /// Comma-separated status filter, e.g. `status=PENDING,APPROVED`.
    pub status: Option<String>,
}

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        AppointmentError::SlotTaken { .. } => AppError::Conflict(e.to_string()),
        AppointmentError::DoctorInactive
        | AppointmentError::InvalidStatusTransition { .. } => AppError::BadRequest(e.to_string()),
        AppointmentError::Validation(_) => AppError::Validation(e.to_string()),
        AppointmentError::NotPermitted => AppError::Auth,
        AppointmentError::Storage(msg) => AppError::Storage(msg),
    }
}

fn parse_statuses(raw: &str) -> Result<Vec<AppointmentStatus>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            serde_json::from_value(json!(s))
                .map_err(|_| AppError::Validation(format!("Unknown status {s:?}")))
        })
        .collect()
}

pub async fn book_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .ledger
        .create(&principal, request)
        .await
        .map_err(map_appointment_error)?;
    Ok(Json(json!({ "success": true, "appointment": appointment })))
}

pub async fn set_status(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(principal): Extension<Principal>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .ledger
        .set_status(&principal, appointment_id, request.status)
        .await
        .map_err(map_appointment_error)?;
    Ok(Json(json!({ "success": true, "appointment": appointment })))
}

/// Scoped listing: patients see their own bookings, practitioners the
/// bookings on their profile, admins everything (optionally narrowed by
/// `doctorId`).
pub async fn list_appointments(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let statuses = params.status.as_deref().map(parse_statuses).transpose()?;

    let query = match &principal {
        Principal::Patient { user_id, .. } => AppointmentQuery {
            user_id: Some(user_id.clone()),
            date: params.date,
            statuses,
            ..Default::default()
        },
        Principal::Practitioner { doctor_id, .. } => AppointmentQuery {
            doctor_id: Some(*doctor_id),
            date: params.date,
            statuses,
            ..Default::default()
        },
        Principal::Administrator { .. } => AppointmentQuery {
            doctor_id: params.doctor_id,
            date: params.date,
            statuses,
            ..Default::default()
        },
    };

    let appointments = state
        .ledger
        .list_for(&query)
        .await
        .map_err(map_appointment_error)?;
    Ok(Json(json!({ "appointments": appointments })))
}

pub async fn get_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(principal): Extension<Principal>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .ledger
        .get(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    let visible = match &principal {
        Principal::Administrator { .. } => true,
        Principal::Practitioner { doctor_id, .. } => appointment.doctor_id == *doctor_id,
        Principal::Patient { user_id, .. } => appointment.user_id == *user_id,
    };
    if !visible {
        return Err(AppError::Auth);
    }

    Ok(Json(json!({ "appointment": appointment })))
}
