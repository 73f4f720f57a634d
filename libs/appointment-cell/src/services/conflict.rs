// libs/appointment-cell/src/services/conflict.rs
use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

/// Predicate marking a stored appointment document as holding the
/// (doctor, date, slot) reservation this booking wants.
///
/// Paired with the store's conditional insert it forms the atomic
/// uniqueness guard: the check runs under the same write guard as the
/// insert, so two racing bookings for the same tuple cannot both pass.
/// Cancelled appointments have released their slot and do not count.
/// The scope is exactly one (doctor, date, slot) tuple; unrelated doctors
/// and days stay independently concurrent.
pub fn holds_reservation(
    doctor_id: Uuid,
    date: NaiveDate,
    slot: &str,
) -> impl Fn(&Value) -> bool + '_ {
    let doctor_id = doctor_id.to_string();
    let date = date.to_string();

    move |doc: &Value| {
        doc["doctorId"] == doctor_id.as_str()
            && doc["date"] == date.as_str()
            && doc["slot"] == slot
            && doc["status"] != "CANCELLED"
    }
}
