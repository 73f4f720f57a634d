use std::collections::HashMap;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::collection::Collection;
use crate::error::StoreError;

/// Emitted on every create/update/delete within a collection. Consumers that
/// want the data re-read the collection; the notice itself is only a ping.
#[derive(Debug, Clone)]
pub struct ChangeNotice {
    pub collection: Collection,
    pub kind: ChangeKind,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

struct CollectionState {
    documents: HashMap<String, Value>,
    feed: broadcast::Sender<ChangeNotice>,
}

/// In-memory document engine with a per-collection change feed.
///
/// All mutations take the single write lock, so a conditional insert
/// observes and writes in one atomic step. The engine stamps `createdAt`
/// and `updatedAt` on every write routed through it.
pub struct DocumentStore {
    collections: HashMap<Collection, RwLock<CollectionState>>,
    feed_capacity: usize,
}

impl DocumentStore {
    pub fn new(feed_capacity: usize) -> Self {
        let collections = Collection::ALL
            .into_iter()
            .map(|c| {
                let (feed, _) = broadcast::channel(feed_capacity);
                (
                    c,
                    RwLock::new(CollectionState {
                        documents: HashMap::new(),
                        feed,
                    }),
                )
            })
            .collect();

        Self {
            collections,
            feed_capacity,
        }
    }

    fn state(&self, collection: Collection) -> &RwLock<CollectionState> {
        // Every variant is seeded in new(), the lookup cannot miss.
        &self.collections[&collection]
    }

    /// Insert a new document, assigning an id when absent.
    pub async fn insert(&self, collection: Collection, doc: Value) -> Result<Value, StoreError> {
        self.insert_if_absent(collection, doc, |_| false).await
    }

    /// Insert a new document only if no existing document in the collection
    /// matches `taken`. The check and the write happen under one write
    /// guard, so two racing inserts cannot both pass the check.
    pub async fn insert_if_absent<F>(
        &self,
        collection: Collection,
        doc: Value,
        taken: F,
    ) -> Result<Value, StoreError>
    where
        F: Fn(&Value) -> bool,
    {
        let mut object = match doc {
            Value::Object(map) => map,
            _ => return Err(StoreError::NotAnObject),
        };

        let mut state = self.state(collection).write().await;

        if state.documents.values().any(&taken) {
            return Err(StoreError::Conflict(format!(
                "an equivalent document already exists in {}",
                collection
            )));
        }

        let id = match object.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        if state.documents.contains_key(&id) {
            return Err(StoreError::Conflict(format!(
                "document {} already exists in {}",
                id, collection
            )));
        }
        let now = Utc::now().to_rfc3339();
        object.insert("id".to_string(), json!(id));
        object.insert("createdAt".to_string(), json!(now));
        object.insert("updatedAt".to_string(), json!(now));

        let stored = Value::Object(object);
        state.documents.insert(id.clone(), stored.clone());
        notify(&state, collection, ChangeKind::Created, &id);

        Ok(stored)
    }

    /// Merge `fields` into an existing document.
    pub async fn patch(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Value, StoreError> {
        self.patch_if(collection, id, fields, |_| true).await
    }

    /// Merge `fields` into an existing document only while it still
    /// satisfies `current`. The check and the merge happen under one write
    /// guard, mirroring `insert_if_absent`, so a caller that validated
    /// against a since-changed document loses with a conflict instead of
    /// overwriting the newer state.
    pub async fn patch_if<F>(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
        current: F,
    ) -> Result<Value, StoreError>
    where
        F: FnOnce(&Value) -> bool,
    {
        let mut state = self.state(collection).write().await;

        let doc = state
            .documents
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;

        if !current(doc) {
            return Err(StoreError::Conflict(format!(
                "document {} in {} no longer satisfies the patch precondition",
                id, collection
            )));
        }

        let object = doc.as_object_mut().ok_or(StoreError::NotAnObject)?;
        for (key, value) in fields {
            object.insert(key, value);
        }
        object.insert("updatedAt".to_string(), json!(Utc::now().to_rfc3339()));

        let updated = doc.clone();
        notify(&state, collection, ChangeKind::Updated, id);
        Ok(updated)
    }

    pub async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut state = self.state(collection).write().await;

        if state.documents.remove(id).is_none() {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        notify(&state, collection, ChangeKind::Deleted, id);
        Ok(())
    }

    pub async fn get(&self, collection: Collection, id: &str) -> Option<Value> {
        let state = self.state(collection).read().await;
        state.documents.get(id).cloned()
    }

    pub async fn get_as<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<T, StoreError> {
        let doc = self
            .get(collection, id)
            .await
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        Ok(serde_json::from_value(doc)?)
    }

    /// The full current contents of a collection. No order guarantee.
    pub async fn list(&self, collection: Collection) -> Vec<Value> {
        let state = self.state(collection).read().await;
        state.documents.values().cloned().collect()
    }

    pub async fn list_as<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError> {
        self.list(collection)
            .await
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    /// Subscribe to the collection's change feed.
    pub async fn watch(&self, collection: Collection) -> broadcast::Receiver<ChangeNotice> {
        let state = self.state(collection).read().await;
        state.feed.subscribe()
    }

    pub fn feed_capacity(&self) -> usize {
        self.feed_capacity
    }
}

fn notify(state: &CollectionState, collection: Collection, kind: ChangeKind, id: &str) {
    let notice = ChangeNotice {
        collection,
        kind,
        id: id.to_string(),
    };
    // No receivers is fine: nobody is watching this collection yet.
    if state.feed.send(notice).is_err() {
        debug!("change notice for {} dropped, no active watchers", collection);
    }
}
