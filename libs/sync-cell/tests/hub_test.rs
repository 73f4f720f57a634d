use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;

use shared_store::{Collection, DocumentStore};
use sync_cell::models::CollectionSnapshot;
use sync_cell::SyncHub;

const RECV_WINDOW: Duration = Duration::from_secs(2);

fn hub() -> (Arc<DocumentStore>, Arc<SyncHub>) {
    let store = Arc::new(DocumentStore::new(16));
    let hub = Arc::new(SyncHub::new(Arc::clone(&store), 16));
    (store, hub)
}

async fn next(subscription: &mut sync_cell::Subscription) -> CollectionSnapshot {
    timeout(RECV_WINDOW, subscription.recv())
        .await
        .expect("snapshot delivery timed out")
}

#[tokio::test]
async fn subscribe_delivers_the_current_snapshot_first() {
    let (store, hub) = hub();
    store
        .insert(Collection::Doctors, json!({ "name": "Dr. Grace" }))
        .await
        .unwrap();

    let mut subscription = hub.subscribe(Collection::Doctors).await;
    let initial = next(&mut subscription).await;

    assert_eq!(initial.collection, Collection::Doctors);
    assert_eq!(initial.documents.len(), 1);
    assert_eq!(initial.documents[0]["name"], "Dr. Grace");
}

#[tokio::test]
async fn every_change_delivers_a_full_replacement_snapshot() {
    let (store, hub) = hub();
    let mut subscription = hub.subscribe(Collection::Doctors).await;

    let initial = next(&mut subscription).await;
    assert!(initial.documents.is_empty());

    let first = store
        .insert(Collection::Doctors, json!({ "name": "Dr. Grace" }))
        .await
        .unwrap();
    let after_insert = next(&mut subscription).await;
    assert_eq!(after_insert.documents.len(), 1);

    store
        .insert(Collection::Doctors, json!({ "name": "Dr. Chen" }))
        .await
        .unwrap();
    let after_second = next(&mut subscription).await;
    assert_eq!(
        after_second.documents.len(),
        2,
        "each delivery carries the whole collection, not a diff"
    );

    store
        .delete(Collection::Doctors, first["id"].as_str().unwrap())
        .await
        .unwrap();
    let after_delete = next(&mut subscription).await;
    assert_eq!(after_delete.documents.len(), 1);
    assert_eq!(after_delete.documents[0]["name"], "Dr. Chen");
}

#[tokio::test]
async fn reapplying_an_unchanged_snapshot_is_idempotent() {
    let (store, hub) = hub();
    store
        .insert(Collection::Brands, json!({ "name": "Wellness Co" }))
        .await
        .unwrap();

    let mut subscription = hub.subscribe(Collection::Brands).await;
    let first = next(&mut subscription).await;
    let replayed = hub.snapshot(Collection::Brands).await;

    // An observer replacing its state with either delivery lands in the
    // same place.
    assert_eq!(first.documents, replayed.documents);
}

#[tokio::test]
async fn observers_of_one_collection_share_a_feed() {
    let (store, hub) = hub();

    let mut a = hub.subscribe(Collection::Doctors).await;
    let mut b = hub.subscribe(Collection::Doctors).await;
    assert_eq!(hub.active_feeds(), 1);

    let _ = next(&mut a).await;
    let _ = next(&mut b).await;

    store
        .insert(Collection::Doctors, json!({ "name": "Dr. Grace" }))
        .await
        .unwrap();

    assert_eq!(next(&mut a).await.documents.len(), 1);
    assert_eq!(next(&mut b).await.documents.len(), 1);
}

#[tokio::test]
async fn last_handle_dropped_releases_the_feed() {
    let (_store, hub) = hub();

    let a = hub.subscribe(Collection::Doctors).await;
    let b = hub.subscribe(Collection::Doctors).await;
    let c = hub.subscribe(Collection::Appointments).await;
    assert_eq!(hub.active_feeds(), 2);

    drop(a);
    assert_eq!(hub.active_feeds(), 2, "a remaining observer keeps the feed");

    drop(b);
    assert_eq!(hub.active_feeds(), 1);

    drop(c);
    assert_eq!(hub.active_feeds(), 0);
}

#[tokio::test]
async fn write_racing_the_subscription_is_still_delivered() {
    let (store, hub) = hub();

    // Write immediately after subscribing, before consuming anything. The
    // initial snapshot may predate the write, but the change feed was
    // hooked up first, so a delivery carrying it must follow.
    let mut subscription = hub.subscribe(Collection::Doctors).await;
    store
        .insert(Collection::Doctors, json!({ "name": "Dr. Grace" }))
        .await
        .unwrap();

    loop {
        let snapshot = next(&mut subscription).await;
        if snapshot.documents.len() == 1 {
            assert_eq!(snapshot.documents[0]["name"], "Dr. Grace");
            break;
        }
        assert!(
            snapshot.documents.is_empty(),
            "only the pre-write view or the post-write view may be delivered"
        );
    }
}

#[tokio::test]
async fn shutdown_degrades_observers_to_an_empty_view() {
    let (store, hub) = hub();
    store
        .insert(Collection::Doctors, json!({ "name": "Dr. Grace" }))
        .await
        .unwrap();

    let mut subscription = hub.subscribe(Collection::Doctors).await;
    assert_eq!(next(&mut subscription).await.documents.len(), 1);

    hub.shutdown();
    assert_eq!(hub.active_feeds(), 0);

    // The dead feed fails open: an empty snapshot, not an error or a hang.
    let degraded = next(&mut subscription).await;
    assert_eq!(degraded.collection, Collection::Doctors);
    assert!(degraded.documents.is_empty());
}

#[tokio::test]
async fn feeds_are_isolated_per_collection() {
    let (store, hub) = hub();
    let mut doctors = hub.subscribe(Collection::Doctors).await;
    let _ = next(&mut doctors).await;

    store
        .insert(Collection::Brands, json!({ "name": "Wellness Co" }))
        .await
        .unwrap();

    let quiet = timeout(Duration::from_millis(200), doctors.recv()).await;
    assert!(
        quiet.is_err(),
        "a change in brands must not wake doctors observers"
    );
}
