//! estate-core: shared infrastructure for the estate back-office client.
pub mod config;
pub mod error;
pub mod observability;

pub use error::ApiError;

pub use reqwest;
pub use serde_json;
pub use tracing;
pub use validator;
