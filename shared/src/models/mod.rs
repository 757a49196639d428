//! Data models
//!
//! Shared between the HTTP client and the application layer.
//! JSON uses camelCase keys; all IDs are `i64`.

pub mod payment_request;
pub mod settings;
pub mod user;

// Re-exports
pub use payment_request::*;
pub use settings::*;
pub use user::*;
