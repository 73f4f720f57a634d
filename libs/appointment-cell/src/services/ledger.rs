// libs/appointment-cell/src/services/ledger.rs
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use access_cell::{AccessGate, Action};
use doctor_cell::models::Doctor;
use shared_models::principal::Principal;
use shared_store::{Collection, DocumentStore, StoreError};

use crate::models::{
    Appointment, AppointmentError, AppointmentQuery, AppointmentStatus, BookAppointmentRequest,
};
use crate::services::conflict::holds_reservation;
use crate::services::lifecycle::AppointmentLifecycle;

/// The only component that mutates booking state. Everything else reads
/// snapshots fanned out by the sync hub.
pub struct AppointmentLedger {
    store: Arc<DocumentStore>,
    lifecycle: AppointmentLifecycle,
    gate: AccessGate,
}

impl AppointmentLedger {
    pub fn new(store: Arc<DocumentStore>, gate: AccessGate) -> Self {
        Self {
            store,
            lifecycle: AppointmentLifecycle::new(),
            gate,
        }
    }

    /// Book a slot on the caller's own behalf. The new appointment starts
    /// PENDING. The insert is conditional on no other non-cancelled
    /// appointment holding the same (doctor, date, slot); a losing
    /// concurrent booking gets `SlotTaken` instead of a double booking.
    pub async fn create(
        &self,
        principal: &Principal,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        self.gate
            .authorize(
                principal,
                &Action::BookAppointment {
                    patient_user_id: principal.user_id().to_string(),
                },
            )
            .require()
            .map_err(|_| AppointmentError::NotPermitted)?;

        if request.slot.trim().is_empty() {
            return Err(AppointmentError::Validation("Slot is required".to_string()));
        }

        let doctor: Doctor = self
            .store
            .get_as(Collection::Doctors, &request.doctor_id.to_string())
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => AppointmentError::DoctorNotFound,
                other => AppointmentError::Storage(other.to_string()),
            })?;

        if !doctor.is_active {
            return Err(AppointmentError::DoctorInactive);
        }

        // Advisory only: a stale client may offer a label the doctor has
        // since removed from the template. The booking still stands.
        if !doctor.available_slots.contains(&request.slot) {
            warn!(
                "slot {:?} is not in doctor {}'s current template, accepting anyway",
                request.slot, doctor.id
            );
        }

        let doc = json!({
            "userId": principal.user_id(),
            "doctorId": request.doctor_id,
            "patientName": principal.display_name(),
            "date": request.date,
            "slot": request.slot,
            "status": AppointmentStatus::Pending.to_string(),
            "notes": request.notes,
        });

        let stored = self
            .store
            .insert_if_absent(
                Collection::Appointments,
                doc,
                holds_reservation(request.doctor_id, request.date, &request.slot),
            )
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppointmentError::SlotTaken {
                    slot: request.slot.clone(),
                    date: request.date,
                },
                other => AppointmentError::Storage(other.to_string()),
            })?;

        let appointment: Appointment = serde_json::from_value(stored)
            .map_err(|e| AppointmentError::Storage(e.to_string()))?;

        info!(
            "appointment {} booked: doctor {} on {} at {:?}",
            appointment.id, appointment.doctor_id, appointment.date, appointment.slot
        );
        Ok(appointment)
    }

    /// Drive the state machine. Practitioners (for their own profile) and
    /// admins may take any legal edge; the owning patient may only cancel.
    /// Authorization is checked before edge legality so a patient probing
    /// an approve is denied rather than told about transitions.
    pub async fn set_status(
        &self,
        principal: &Principal,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let current: Appointment = self
            .store
            .get_as(Collection::Appointments, &appointment_id.to_string())
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => AppointmentError::NotFound,
                other => AppointmentError::Storage(other.to_string()),
            })?;

        let action = if new_status == AppointmentStatus::Cancelled
            && principal.user_id() == current.user_id
        {
            Action::SelfCancel {
                patient_user_id: current.user_id.clone(),
            }
        } else {
            Action::ApproveOrReject {
                doctor_id: current.doctor_id,
            }
        };

        self.gate
            .authorize(principal, &action)
            .require()
            .map_err(|_| AppointmentError::NotPermitted)?;

        // Fast path: report the obvious illegal edge before touching the
        // write lock.
        self.lifecycle
            .validate_status_transition(current.status, new_status)?;

        let mut fields = Map::new();
        fields.insert("status".to_string(), json!(new_status.to_string()));

        // The edge is validated again under the store's write guard: the
        // status may have moved since the read above, and a stale caller
        // must lose rather than overwrite the newer state (a cancelled
        // appointment never comes back).
        let patched = self
            .store
            .patch_if(
                Collection::Appointments,
                &appointment_id.to_string(),
                fields,
                |doc| {
                    Self::stored_status(doc).is_some_and(|live| {
                        self.lifecycle
                            .validate_status_transition(live, new_status)
                            .is_ok()
                    })
                },
            )
            .await;

        let updated = match patched {
            Ok(updated) => updated,
            Err(StoreError::NotFound { .. }) => return Err(AppointmentError::NotFound),
            Err(StoreError::Conflict(_)) => {
                let fresh: Appointment = self
                    .store
                    .get_as(Collection::Appointments, &appointment_id.to_string())
                    .await
                    .map_err(|e| AppointmentError::Storage(e.to_string()))?;
                return Err(AppointmentError::InvalidStatusTransition {
                    from: fresh.status,
                    to: new_status,
                });
            }
            Err(other) => return Err(AppointmentError::Storage(other.to_string())),
        };

        let appointment: Appointment = serde_json::from_value(updated)
            .map_err(|e| AppointmentError::Storage(e.to_string()))?;

        info!(
            "appointment {} moved {} -> {}",
            appointment_id, current.status, new_status
        );
        Ok(appointment)
    }

    /// Read-only projection over the current snapshot.
    pub async fn list_for(
        &self,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut appointments: Vec<Appointment> = self
            .store
            .list_as(Collection::Appointments)
            .await
            .map_err(|e| AppointmentError::Storage(e.to_string()))?;

        appointments.retain(|apt| {
            query.user_id.as_deref().map_or(true, |id| apt.user_id == id)
                && query.doctor_id.map_or(true, |id| apt.doctor_id == id)
                && query.date.map_or(true, |d| apt.date == d)
                && query
                    .statuses
                    .as_deref()
                    .map_or(true, |set| set.contains(&apt.status))
        });

        debug!("listed {} appointments for {:?}", appointments.len(), query);
        Ok(appointments)
    }

    fn stored_status(doc: &Value) -> Option<AppointmentStatus> {
        serde_json::from_value(doc["status"].clone()).ok()
    }

    pub async fn get(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.store
            .get_as(Collection::Appointments, &appointment_id.to_string())
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => AppointmentError::NotFound,
                other => AppointmentError::Storage(other.to_string()),
            })
    }
}
