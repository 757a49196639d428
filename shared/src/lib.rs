//! Shared types for PayDesk
//!
//! Domain models, money helpers, API DTOs and the unified error system used
//! by both the HTTP client and the application layer.

pub mod client;
pub mod error;
pub mod models;
pub mod money;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{
    PaymentRequest, RequestDetails, RequestStatus, Role, TemplateType, User,
};
