// libs/sync-cell/src/models.rs
use serde::Serialize;
use serde_json::Value;

use shared_store::Collection;

/// The full materialized contents of one collection at one moment.
///
/// Every delivery is a full replacement, never a diff: an observer applies
/// it by discarding whatever it held before. Repeating an unchanged
/// snapshot is therefore harmless, which is what lets delivery be
/// at-least-once. No order guarantee on `documents`.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSnapshot {
    pub collection: Collection,
    pub documents: Vec<Value>,
}

impl CollectionSnapshot {
    /// The degraded delivery used when a feed fails: an empty view beats a
    /// crashed one.
    pub fn empty(collection: Collection) -> Self {
        Self {
            collection,
            documents: Vec::new(),
        }
    }
}
