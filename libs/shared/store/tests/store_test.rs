use assert_matches::assert_matches;
use serde_json::{json, Map};

use shared_store::{ChangeKind, Collection, DocumentStore, StoreError};

#[tokio::test]
async fn insert_assigns_id_and_timestamps() {
    let store = DocumentStore::new(16);

    let stored = store
        .insert(Collection::Brands, json!({ "name": "Acme Health" }))
        .await
        .expect("insert should succeed");

    assert!(!stored["id"].as_str().unwrap().is_empty());
    assert!(stored["createdAt"].is_string());
    assert!(stored["updatedAt"].is_string());
    assert_eq!(stored["name"], "Acme Health");
}

#[tokio::test]
async fn insert_keeps_explicit_id() {
    let store = DocumentStore::new(16);

    let stored = store
        .insert(Collection::Users, json!({ "id": "user-1", "name": "Ana" }))
        .await
        .unwrap();

    assert_eq!(stored["id"], "user-1");
    assert!(store.get(Collection::Users, "user-1").await.is_some());
}

#[tokio::test]
async fn insert_rejects_duplicate_explicit_id() {
    let store = DocumentStore::new(16);

    store
        .insert(Collection::Users, json!({ "id": "user-1", "name": "Ana" }))
        .await
        .unwrap();

    let second = store
        .insert(Collection::Users, json!({ "id": "user-1", "name": "Impostor" }))
        .await;
    assert_matches!(second, Err(StoreError::Conflict(_)));

    let kept = store.get(Collection::Users, "user-1").await.unwrap();
    assert_eq!(kept["name"], "Ana", "the original document is untouched");
}

#[tokio::test]
async fn insert_rejects_non_object() {
    let store = DocumentStore::new(16);

    let result = store.insert(Collection::Brands, json!("just a string")).await;
    assert_matches!(result, Err(StoreError::NotAnObject));
}

#[tokio::test]
async fn conditional_insert_rejects_when_predicate_matches() {
    let store = DocumentStore::new(16);

    store
        .insert(Collection::Appointments, json!({ "slot": "09:00 AM" }))
        .await
        .unwrap();

    let second = store
        .insert_if_absent(
            Collection::Appointments,
            json!({ "slot": "09:00 AM" }),
            |doc| doc["slot"] == "09:00 AM",
        )
        .await;

    assert_matches!(second, Err(StoreError::Conflict(_)));
    assert_eq!(store.list(Collection::Appointments).await.len(), 1);
}

#[tokio::test]
async fn patch_merges_fields_and_bumps_updated_at() {
    let store = DocumentStore::new(16);
    let stored = store
        .insert(Collection::Doctors, json!({ "name": "Dr. Ada", "isActive": true }))
        .await
        .unwrap();
    let id = stored["id"].as_str().unwrap();

    let mut fields = Map::new();
    fields.insert("isActive".to_string(), json!(false));
    let updated = store.patch(Collection::Doctors, id, fields).await.unwrap();

    assert_eq!(updated["isActive"], false);
    assert_eq!(updated["name"], "Dr. Ada");
}

#[tokio::test]
async fn conditional_patch_applies_only_while_the_precondition_holds() {
    let store = DocumentStore::new(16);
    let stored = store
        .insert(
            Collection::Appointments,
            json!({ "slot": "09:00 AM", "status": "PENDING" }),
        )
        .await
        .unwrap();
    let id = stored["id"].as_str().unwrap();

    let mut fields = Map::new();
    fields.insert("status".to_string(), json!("APPROVED"));
    let updated = store
        .patch_if(Collection::Appointments, id, fields, |doc| {
            doc["status"] == "PENDING"
        })
        .await
        .unwrap();
    assert_eq!(updated["status"], "APPROVED");

    // The precondition sees the new state now, so the same patch loses.
    let mut fields = Map::new();
    fields.insert("status".to_string(), json!("APPROVED"));
    let stale = store
        .patch_if(Collection::Appointments, id, fields, |doc| {
            doc["status"] == "PENDING"
        })
        .await;
    assert_matches!(stale, Err(StoreError::Conflict(_)));

    let kept = store.get(Collection::Appointments, id).await.unwrap();
    assert_eq!(kept["status"], "APPROVED");
}

#[tokio::test]
async fn patch_missing_document_is_not_found() {
    let store = DocumentStore::new(16);

    let result = store
        .patch(Collection::Doctors, "nope", Map::new())
        .await;

    assert_matches!(result, Err(StoreError::NotFound { .. }));
}

#[tokio::test]
async fn delete_missing_document_is_not_found() {
    let store = DocumentStore::new(16);

    let result = store.delete(Collection::Brands, "nope").await;
    assert_matches!(result, Err(StoreError::NotFound { .. }));
}

#[tokio::test]
async fn watch_emits_notices_for_each_mutation() {
    let store = DocumentStore::new(16);
    let mut feed = store.watch(Collection::Brands).await;

    let stored = store
        .insert(Collection::Brands, json!({ "name": "Acme" }))
        .await
        .unwrap();
    let id = stored["id"].as_str().unwrap().to_string();

    let mut fields = Map::new();
    fields.insert("name".to_string(), json!("Acme Health"));
    store.patch(Collection::Brands, &id, fields).await.unwrap();
    store.delete(Collection::Brands, &id).await.unwrap();

    let created = feed.recv().await.unwrap();
    assert_eq!(created.kind, ChangeKind::Created);
    assert_eq!(created.id, id);

    let updated = feed.recv().await.unwrap();
    assert_eq!(updated.kind, ChangeKind::Updated);

    let deleted = feed.recv().await.unwrap();
    assert_eq!(deleted.kind, ChangeKind::Deleted);
}

#[tokio::test]
async fn watchers_of_other_collections_stay_quiet() {
    let store = DocumentStore::new(16);
    let mut doctors_feed = store.watch(Collection::Doctors).await;

    store
        .insert(Collection::Brands, json!({ "name": "Acme" }))
        .await
        .unwrap();

    assert_matches!(
        doctors_feed.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    );
}
