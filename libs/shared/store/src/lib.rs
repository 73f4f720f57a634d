pub mod collection;
pub mod error;
pub mod store;

pub use collection::Collection;
pub use error::StoreError;
pub use store::{ChangeKind, ChangeNotice, DocumentStore};
