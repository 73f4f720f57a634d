use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;

use directory_cell::models::{AddBrandRequest, DirectoryError};
use directory_cell::services::DirectoryService;
use shared_store::{Collection, DocumentStore};

fn service(store: &Arc<DocumentStore>) -> DirectoryService {
    DirectoryService::new(Arc::clone(store))
}

#[tokio::test]
async fn hospitals_list_reflects_seeded_documents() {
    let store = Arc::new(DocumentStore::new(16));
    let directory = service(&store);

    assert!(directory.list_hospitals().await.unwrap().is_empty());

    store
        .insert(
            Collection::Hospitals,
            json!({
                "name": "St. Mary General",
                "location": "Riverside",
                "imageUrl": "https://example.test/st-mary.png",
                "badges": ["24/7", "Emergency"],
            }),
        )
        .await
        .unwrap();

    let hospitals = directory.list_hospitals().await.unwrap();
    assert_eq!(hospitals.len(), 1);
    assert_eq!(hospitals[0].name, "St. Mary General");
    assert_eq!(hospitals[0].badges, vec!["24/7", "Emergency"]);
}

#[tokio::test]
async fn hospital_badges_default_to_empty() {
    let store = Arc::new(DocumentStore::new(16));
    let directory = service(&store);

    store
        .insert(
            Collection::Hospitals,
            json!({
                "name": "Hillcrest Clinic",
                "location": "Northside",
                "imageUrl": "https://example.test/hillcrest.png",
            }),
        )
        .await
        .unwrap();

    let hospitals = directory.list_hospitals().await.unwrap();
    assert!(hospitals[0].badges.is_empty());
}

#[tokio::test]
async fn brands_round_trip_through_the_directory() {
    let store = Arc::new(DocumentStore::new(16));
    let directory = service(&store);

    let brand = directory
        .add_brand(AddBrandRequest {
            name: "  Wellness Co  ".to_string(),
            image_url: None,
        })
        .await
        .unwrap();
    assert_eq!(brand.name, "Wellness Co", "brand names are trimmed");

    let brands = directory.list_brands().await.unwrap();
    assert_eq!(brands.len(), 1);

    directory.remove_brand(brand.id).await.unwrap();
    assert!(directory.list_brands().await.unwrap().is_empty());
}

#[tokio::test]
async fn brand_name_is_required() {
    let store = Arc::new(DocumentStore::new(16));
    let directory = service(&store);

    let result = directory
        .add_brand(AddBrandRequest {
            name: "   ".to_string(),
            image_url: None,
        })
        .await;
    assert_matches!(result, Err(DirectoryError::Validation(_)));
}

#[tokio::test]
async fn removing_an_unknown_brand_reports_not_found() {
    let store = Arc::new(DocumentStore::new(16));
    let directory = service(&store);

    let result = directory.remove_brand(Uuid::new_v4()).await;
    assert_matches!(result, Err(DirectoryError::BrandNotFound));
}
