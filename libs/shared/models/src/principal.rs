use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Wire shape of a document in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Present only for DOCTOR-role users; binds to the `doctors` collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Doctor,
    Admin,
}

/// An authenticated caller, resolved from their user document.
///
/// The practitioner binding is part of the variant, so "a practitioner
/// without a linked profile" cannot exist past this boundary. A DOCTOR-role
/// user document missing its binding resolves to a patient-capability
/// principal instead of crashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Patient { user_id: String, name: String },
    Practitioner { user_id: String, name: String, doctor_id: Uuid },
    Administrator { user_id: String, name: String },
}

impl Principal {
    pub fn from_record(record: UserRecord) -> Self {
        match (record.role, record.doctor_id) {
            (Role::Admin, _) => Principal::Administrator {
                user_id: record.id,
                name: record.name,
            },
            (Role::Doctor, Some(doctor_id)) => Principal::Practitioner {
                user_id: record.id,
                name: record.name,
                doctor_id,
            },
            (Role::Doctor, None) => {
                // Degraded but valid state: read and self-service only.
                warn!(
                    "user {} has DOCTOR role but no doctor binding, treating as patient",
                    record.id
                );
                Principal::Patient {
                    user_id: record.id,
                    name: record.name,
                }
            }
            (Role::User, _) => Principal::Patient {
                user_id: record.id,
                name: record.name,
            },
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Principal::Patient { user_id, .. }
            | Principal::Practitioner { user_id, .. }
            | Principal::Administrator { user_id, .. } => user_id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Principal::Patient { name, .. }
            | Principal::Practitioner { name, .. }
            | Principal::Administrator { name, .. } => name,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Administrator { .. })
    }

    /// The bound practitioner profile, if any.
    pub fn doctor_binding(&self) -> Option<Uuid> {
        match self {
            Principal::Practitioner { doctor_id, .. } => Some(*doctor_id),
            _ => None,
        }
    }
}
