// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// An appointment as persisted in the `appointments` collection.
///
/// `slot` is a snapshot of the label at booking time, not a live reference
/// into the doctor's template, and is immutable after creation; only
/// `status` moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: String,
    pub doctor_id: Uuid,
    pub patient_name: String,
    /// Practitioner-local calendar day, serialized `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub slot: String,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Cancelled,
}

impl AppointmentStatus {
    /// Non-cancelled appointments hold their slot.
    pub fn holds_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "PENDING"),
            AppointmentStatus::Approved => write!(f, "APPROVED"),
            AppointmentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub slot: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetStatusRequest {
    pub status: AppointmentStatus,
}

/// Filter over the ledger's current snapshot. Every present field must
/// match; `statuses` is a set.
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
    pub user_id: Option<String>,
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub statuses: Option<Vec<AppointmentStatus>>,
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Doctor is not accepting appointments")]
    DoctorInactive,

    #[error("Slot {slot:?} on {date} is already booked")]
    SlotTaken { slot: String, date: NaiveDate },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Not permitted")]
    NotPermitted,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
