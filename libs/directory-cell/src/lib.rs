pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::{brand_routes, hospital_routes};
