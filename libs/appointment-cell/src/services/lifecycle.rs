// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus};

/// The appointment state machine.
///
/// PENDING is the initial state on create. CANCELLED is terminal: no edge
/// leaves it, so a cancelled appointment can never regress. Re-applying the
/// current status is rejected like any other illegal edge.
pub struct AppointmentLifecycle;

impl AppointmentLifecycle {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_status_transition(
        &self,
        current: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("validating status transition {} -> {}", current, next);

        if !self.valid_transitions(current).contains(&next) {
            warn!("rejected status transition {} -> {}", current, next);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current,
                to: next,
            });
        }
        Ok(())
    }

    pub fn valid_transitions(&self, current: AppointmentStatus) -> &'static [AppointmentStatus] {
        match current {
            AppointmentStatus::Pending => {
                &[AppointmentStatus::Approved, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Approved => &[AppointmentStatus::Cancelled],
            AppointmentStatus::Cancelled => &[],
        }
    }
}

impl Default for AppointmentLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
