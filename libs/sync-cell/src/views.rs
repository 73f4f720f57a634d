// libs/sync-cell/src/views.rs
use serde_json::Value;
use tracing::debug;

/// Fallback shown when an appointment references a doctor that no longer
/// exists. Deleting a doctor does not cascade, so readers must tolerate
/// dangling ids.
pub const UNKNOWN_DOCTOR: &str = "Unknown Doctor";

/// Resolve a doctor id against a doctors snapshot.
pub fn doctor_display_name(doctors: &[Value], doctor_id: &str) -> String {
    doctors
        .iter()
        .find(|doc| doc["id"] == doctor_id)
        .and_then(|doc| doc["name"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            debug!("doctor {} not in snapshot, using fallback name", doctor_id);
            UNKNOWN_DOCTOR.to_string()
        })
}

/// Join an appointments snapshot against a doctors snapshot, annotating
/// each appointment with a `doctorName`. The two snapshots carry no mutual
/// ordering guarantee, so a missing doctor degrades to the fallback rather
/// than dropping the row.
pub fn appointment_rows(appointments: &[Value], doctors: &[Value]) -> Vec<Value> {
    appointments
        .iter()
        .map(|appointment| {
            let mut row = appointment.clone();
            let name = appointment["doctorId"]
                .as_str()
                .map(|id| doctor_display_name(doctors, id))
                .unwrap_or_else(|| UNKNOWN_DOCTOR.to_string());
            row["doctorName"] = Value::String(name);
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dangling_doctor_id_falls_back_to_unknown() {
        let doctors = vec![json!({ "id": "d-1", "name": "Dr. Grace" })];

        assert_eq!(doctor_display_name(&doctors, "d-1"), "Dr. Grace");
        assert_eq!(doctor_display_name(&doctors, "d-gone"), UNKNOWN_DOCTOR);
        assert_eq!(doctor_display_name(&[], "d-1"), UNKNOWN_DOCTOR);
    }

    #[test]
    fn rows_keep_orphaned_appointments() {
        let doctors = vec![json!({ "id": "d-1", "name": "Dr. Grace" })];
        let appointments = vec![
            json!({ "id": "a-1", "doctorId": "d-1", "slot": "09:00 AM" }),
            json!({ "id": "a-2", "doctorId": "d-gone", "slot": "10:00 AM" }),
        ];

        let rows = appointment_rows(&appointments, &doctors);
        assert_eq!(rows.len(), 2, "orphaned rows are kept, not dropped");
        assert_eq!(rows[0]["doctorName"], "Dr. Grace");
        assert_eq!(rows[1]["doctorName"], UNKNOWN_DOCTOR);
    }
}
