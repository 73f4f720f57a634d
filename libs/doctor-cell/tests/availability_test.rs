use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use doctor_cell::models::CreateDoctorRequest;
use doctor_cell::services::availability::{
    booked_slots, resolve_free_slots, AvailabilityService,
};
use doctor_cell::services::catalog::ScheduleCatalog;
use shared_store::{Collection, DocumentStore};

fn labels(slots: &[&str]) -> Vec<String> {
    slots.iter().map(|s| s.to_string()).collect()
}

fn booked(slots: &[&str]) -> HashSet<String> {
    slots.iter().map(|s| s.to_string()).collect()
}

#[test]
fn resolve_is_template_minus_booked_in_template_order() {
    let template = labels(&["09:00 AM", "10:00 AM", "11:00 AM"]);
    let result = resolve_free_slots(&template, &booked(&["10:00 AM"]));

    assert_eq!(result, labels(&["09:00 AM", "11:00 AM"]));
}

#[test]
fn resolve_empty_template_yields_empty_result() {
    let result = resolve_free_slots(&[], &booked(&["09:00 AM"]));
    assert!(result.is_empty());
}

#[test]
fn resolve_with_no_bookings_returns_whole_template() {
    let template = labels(&["09:00 AM", "02:00 PM"]);
    let result = resolve_free_slots(&template, &HashSet::new());

    assert_eq!(result, template);
}

#[test]
fn resolve_ignores_booked_labels_outside_the_template() {
    let template = labels(&["09:00 AM"]);
    let result = resolve_free_slots(&template, &booked(&["03:00 PM"]));

    assert_eq!(result, template);
}

#[test]
fn booked_slots_matches_doctor_date_and_skips_cancelled() {
    let doctor_id = Uuid::new_v4();
    let other_doctor = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let appointments = vec![
        json!({ "doctorId": doctor_id, "date": "2024-06-01", "slot": "09:00 AM", "status": "PENDING" }),
        json!({ "doctorId": doctor_id, "date": "2024-06-01", "slot": "10:00 AM", "status": "CANCELLED" }),
        json!({ "doctorId": doctor_id, "date": "2024-06-02", "slot": "11:00 AM", "status": "APPROVED" }),
        json!({ "doctorId": other_doctor, "date": "2024-06-01", "slot": "11:00 AM", "status": "APPROVED" }),
    ];

    let result = booked_slots(&appointments, doctor_id, date);

    assert_eq!(result, booked(&["09:00 AM"]));
}

#[tokio::test]
async fn free_slots_reflects_current_bookings() {
    let store = Arc::new(DocumentStore::new(16));
    let catalog = ScheduleCatalog::new(Arc::clone(&store));
    let availability = AvailabilityService::new(Arc::clone(&store));

    let doctor = catalog
        .create_doctor(CreateDoctorRequest {
            name: "Dr. Ada".to_string(),
            specialization: "Cardiology".to_string(),
            experience: 10,
            image_url: "https://example.test/ada.png".to_string(),
            description: None,
            available_slots: labels(&["09:00 AM", "10:00 AM"]),
        })
        .await
        .unwrap();

    store
        .insert(
            Collection::Appointments,
            json!({
                "userId": "u-1",
                "doctorId": doctor.id,
                "patientName": "Pat",
                "date": "2024-06-01",
                "slot": "09:00 AM",
                "status": "PENDING",
            }),
        )
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let free = availability.free_slots(doctor.id, date).await.unwrap();
    assert_eq!(free, labels(&["10:00 AM"]));

    // A different day is unaffected.
    let other_day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
    let free = availability.free_slots(doctor.id, other_day).await.unwrap();
    assert_eq!(free, labels(&["09:00 AM", "10:00 AM"]));
}

#[tokio::test]
async fn free_slots_for_unknown_doctor_is_not_found() {
    let store = Arc::new(DocumentStore::new(16));
    let availability = AvailabilityService::new(store);

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let result = availability.free_slots(Uuid::new_v4(), date).await;

    assert!(matches!(result, Err(doctor_cell::models::DoctorError::NotFound)));
}
