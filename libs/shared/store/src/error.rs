use thiserror::Error;

use crate::collection::Collection;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document {id} not found in {collection}")]
    NotFound { collection: Collection, id: String },

    #[error("Conditional write rejected: {0}")]
    Conflict(String),

    #[error("Document must be a JSON object")]
    NotAnObject,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
