use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A practitioner profile as persisted in the `doctors` collection.
///
/// `available_slots` is the slot template: the ordered set of opaque labels
/// the practitioner offers on any day. A label carries no duration or
/// timezone semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    /// Years of experience.
    pub experience: i32,
    pub image_url: String,
    /// Inactive profiles are hidden from public listing but keep their data.
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub available_slots: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialization: String,
    pub experience: i32,
    pub image_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub available_slots: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSlotRequest {
    pub label: String,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Slot {0:?} is already in the template")]
    DuplicateSlot(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
