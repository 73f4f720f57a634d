use tracing::debug;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::principal::Principal;

/// A mutation a caller may attempt. Every write path in the system names its
/// action here and consults the gate before touching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Edit the slot template or visibility of a practitioner profile.
    EditOwnSchedule { doctor_id: Uuid },
    /// Approve or reject an appointment targeting a practitioner profile.
    ApproveOrReject { doctor_id: Uuid },
    /// Cancel one's own appointment.
    SelfCancel { patient_user_id: String },
    /// Create an appointment on one's own behalf.
    BookAppointment { patient_user_id: String },
    CreateDoctor,
    DeleteDoctor,
    ManageBrands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Turn a denial into the uniform authorization error. The error never
    /// states which check failed.
    pub fn require(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AppError::Auth),
        }
    }
}

/// Single authorization point for the whole system. Deny is the default for
/// any combination not explicitly allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGate;

impl AccessGate {
    pub fn new() -> Self {
        Self
    }

    pub fn authorize(&self, principal: &Principal, action: &Action) -> Decision {
        let decision = match (principal, action) {
            (Principal::Administrator { .. }, _) => Decision::Allow,

            (
                Principal::Practitioner { doctor_id, .. },
                Action::EditOwnSchedule { doctor_id: target },
            ) if doctor_id == target => Decision::Allow,

            (
                Principal::Practitioner { doctor_id, .. },
                Action::ApproveOrReject { doctor_id: target },
            ) if doctor_id == target => Decision::Allow,

            // Any non-admin may cancel or book strictly on their own behalf.
            (_, Action::SelfCancel { patient_user_id }) if principal.user_id() == patient_user_id => {
                Decision::Allow
            }
            (_, Action::BookAppointment { patient_user_id })
                if principal.user_id() == patient_user_id =>
            {
                Decision::Allow
            }

            _ => Decision::Deny,
        };

        debug!(
            "access decision for user {} on {:?}: {:?}",
            principal.user_id(),
            action,
            decision
        );
        decision
    }
}
