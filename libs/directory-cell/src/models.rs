// libs/directory-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Display-only hospital entry. Nothing in the booking flow writes these;
/// they are seeded out of band and listed as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub image_url: String,
    /// Display labels like "24/7" or "Emergency".
    #[serde(default)]
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBrandRequest {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Brand not found")]
    BrandNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
