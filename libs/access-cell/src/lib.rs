pub mod extractor;
pub mod gate;

pub use extractor::principal_middleware;
pub use gate::{AccessGate, Action, Decision};
