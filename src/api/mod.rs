//! REST API layer

pub mod analyze;
pub mod error;
pub mod health;
pub mod history;
pub mod openapi;

pub use error::ApiError;
