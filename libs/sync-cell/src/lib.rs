pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod views;

pub use router::sync_routes;
pub use services::hub::{SyncHub, Subscription};
