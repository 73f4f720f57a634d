// libs/doctor-cell/src/services/availability.rs

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_store::{Collection, DocumentStore, StoreError};

use crate::models::{Doctor, DoctorError};

/// Template minus booked, preserving template order. Pure and total: an
/// empty template yields an empty result, labels never booked all come back
/// free.
pub fn resolve_free_slots(template: &[String], booked: &HashSet<String>) -> Vec<String> {
    template
        .iter()
        .filter(|slot| !booked.contains(*slot))
        .cloned()
        .collect()
}

/// Slot labels held by non-cancelled appointments for (doctor, date).
///
/// Works on raw appointment documents so the schedule side stays decoupled
/// from the ledger's typed model. Date comparison is exact string equality
/// on the `YYYY-MM-DD` form.
pub fn booked_slots(appointments: &[Value], doctor_id: Uuid, date: NaiveDate) -> HashSet<String> {
    let doctor_id = doctor_id.to_string();
    let date = date.to_string();

    appointments
        .iter()
        .filter(|apt| {
            apt["doctorId"] == doctor_id.as_str()
                && apt["date"] == date.as_str()
                && apt["status"] != "CANCELLED"
        })
        .filter_map(|apt| apt["slot"].as_str().map(str::to_string))
        .collect()
}

pub struct AvailabilityService {
    store: Arc<DocumentStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// The subset of a doctor's template still free on `date`.
    pub async fn free_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<String>, DoctorError> {
        let doctor: Doctor = self
            .store
            .get_as(Collection::Doctors, &doctor_id.to_string())
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => DoctorError::NotFound,
                other => DoctorError::Storage(other.to_string()),
            })?;

        let appointments = self.store.list(Collection::Appointments).await;
        let booked = booked_slots(&appointments, doctor_id, date);

        let free = resolve_free_slots(&doctor.available_slots, &booked);
        debug!(
            "doctor {} on {}: {} of {} slots free",
            doctor_id,
            date,
            free.len(),
            doctor.available_slots.len()
        );
        Ok(free)
    }
}
