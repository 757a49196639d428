//! Client-related types shared by the HTTP client and the application
//!
//! Request/response bodies of the auth and review endpoints.

use serde::{Deserialize, Serialize};

use crate::models::User;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

// =============================================================================
// Review API DTOs
// =============================================================================

/// Approve / reject body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub comment: String,
}
