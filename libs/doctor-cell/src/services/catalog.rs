// libs/doctor-cell/src/services/catalog.rs

use std::sync::Arc;

use serde_json::{json, Map};
use tracing::{debug, info};
use uuid::Uuid;

use shared_store::{Collection, DocumentStore, StoreError};

use crate::models::{CreateDoctorRequest, Doctor, DoctorError};

/// Owns the practitioner profiles and their slot templates. All operations
/// are direct field mutations with existence checks only; deleting a doctor
/// deliberately does not touch appointments that reference it.
pub struct ScheduleCatalog {
    store: Arc<DocumentStore>,
}

impl ScheduleCatalog {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        if request.name.trim().is_empty() {
            return Err(DoctorError::Validation("Doctor name is required".to_string()));
        }

        let mut template = Vec::new();
        for label in request.available_slots {
            if !template.contains(&label) {
                template.push(label);
            }
        }

        let doc = json!({
            "name": request.name,
            "specialization": request.specialization,
            "experience": request.experience,
            "imageUrl": request.image_url,
            "isActive": true,
            "description": request.description,
            "availableSlots": template,
        });

        let stored = self
            .store
            .insert(Collection::Doctors, doc)
            .await
            .map_err(|e| DoctorError::Storage(e.to_string()))?;

        let doctor: Doctor =
            serde_json::from_value(stored).map_err(|e| DoctorError::Storage(e.to_string()))?;
        info!("created doctor {} ({})", doctor.id, doctor.name);
        Ok(doctor)
    }

    pub async fn delete_doctor(&self, doctor_id: Uuid) -> Result<(), DoctorError> {
        self.store
            .delete(Collection::Doctors, &doctor_id.to_string())
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => DoctorError::NotFound,
                other => DoctorError::Storage(other.to_string()),
            })?;
        info!("deleted doctor {}", doctor_id);
        Ok(())
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        self.store
            .get_as(Collection::Doctors, &doctor_id.to_string())
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => DoctorError::NotFound,
                other => DoctorError::Storage(other.to_string()),
            })
    }

    /// Public listings hide inactive profiles; admin views include them.
    pub async fn list_doctors(&self, include_hidden: bool) -> Result<Vec<Doctor>, DoctorError> {
        let mut doctors: Vec<Doctor> = self
            .store
            .list_as(Collection::Doctors)
            .await
            .map_err(|e| DoctorError::Storage(e.to_string()))?;

        if !include_hidden {
            doctors.retain(|d| d.is_active);
        }
        Ok(doctors)
    }

    /// Append a label to the template. The template is an ordered set:
    /// duplicates are rejected.
    pub async fn add_slot(&self, doctor_id: Uuid, label: String) -> Result<Doctor, DoctorError> {
        if label.trim().is_empty() {
            return Err(DoctorError::Validation("Slot label is required".to_string()));
        }

        let mut doctor = self.get_doctor(doctor_id).await?;
        if doctor.available_slots.contains(&label) {
            return Err(DoctorError::DuplicateSlot(label));
        }
        doctor.available_slots.push(label.clone());

        let updated = self.write_template(doctor_id, doctor.available_slots).await?;
        debug!("doctor {}: added slot {:?}", doctor_id, label);
        Ok(updated)
    }

    /// Remove a label from the template. Removing an absent label is a
    /// no-op; shrinking never touches appointments already holding the
    /// label.
    pub async fn remove_slot(&self, doctor_id: Uuid, label: &str) -> Result<Doctor, DoctorError> {
        let mut doctor = self.get_doctor(doctor_id).await?;
        doctor.available_slots.retain(|slot| slot != label);

        let updated = self.write_template(doctor_id, doctor.available_slots).await?;
        debug!("doctor {}: removed slot {:?}", doctor_id, label);
        Ok(updated)
    }

    pub async fn toggle_active(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        let doctor = self.get_doctor(doctor_id).await?;

        let mut fields = Map::new();
        fields.insert("isActive".to_string(), json!(!doctor.is_active));

        let updated = self
            .store
            .patch(Collection::Doctors, &doctor_id.to_string(), fields)
            .await
            .map_err(|e| DoctorError::Storage(e.to_string()))?;

        serde_json::from_value(updated).map_err(|e| DoctorError::Storage(e.to_string()))
    }

    async fn write_template(
        &self,
        doctor_id: Uuid,
        template: Vec<String>,
    ) -> Result<Doctor, DoctorError> {
        let mut fields = Map::new();
        fields.insert("availableSlots".to_string(), json!(template));

        let updated = self
            .store
            .patch(Collection::Doctors, &doctor_id.to_string(), fields)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => DoctorError::NotFound,
                other => DoctorError::Storage(other.to_string()),
            })?;

        serde_json::from_value(updated).map_err(|e| DoctorError::Storage(e.to_string()))
    }
}
