//! Client error types

use serde_json::Value;
use shared::{AppError, ErrorCode};
use std::collections::HashMap;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required; the stored session has been cleared
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error envelope returned by the backend
    #[error("API error {code}: {message}")]
    Api {
        code: u16,
        message: String,
        details: Option<HashMap<String, Value>>,
    },

    /// Login rejected
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Local session storage failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    /// Network failures, non-2xx answers other than 401 and malformed
    /// bodies may be replaced by mock data.
    pub fn is_fallback_eligible(&self) -> bool {
        match self {
            ClientError::Http(_)
            | ClientError::InvalidResponse(_)
            | ClientError::Forbidden(_)
            | ClientError::NotFound(_)
            | ClientError::Validation(_)
            | ClientError::Internal(_)
            | ClientError::Serialization(_)
            | ClientError::Api { .. } => true,
            ClientError::Unauthorized
            | ClientError::InvalidCredentials
            | ClientError::Storage(_) => false,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api {
                code,
                message,
                details,
            } => AppError {
                code: ErrorCode::try_from(code).unwrap_or(ErrorCode::Unknown),
                message,
                details,
            },
            ClientError::Unauthorized => AppError::new(ErrorCode::SessionExpired),
            ClientError::InvalidCredentials => AppError::invalid_credentials(),
            ClientError::Forbidden(msg) => AppError::permission_denied(msg),
            ClientError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            ClientError::Validation(msg) => AppError::validation(msg),
            ClientError::Storage(msg) => AppError::storage(msg),
            ClientError::Http(e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, e.to_string())
            }
            ClientError::Http(e) => AppError::with_message(ErrorCode::NetworkError, e.to_string()),
            other => AppError::internal(other.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_eligibility() {
        assert!(ClientError::Internal("boom".into()).is_fallback_eligible());
        assert!(ClientError::InvalidResponse("not json".into()).is_fallback_eligible());
        assert!(
            ClientError::Api {
                code: 3001,
                message: "missing".into(),
                details: None
            }
            .is_fallback_eligible()
        );
        assert!(!ClientError::Unauthorized.is_fallback_eligible());
        assert!(!ClientError::InvalidCredentials.is_fallback_eligible());
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = ClientError::Api {
            code: 3002,
            message: "Already approved".into(),
            details: None,
        }
        .into();
        assert_eq!(err.code, ErrorCode::RequestNotPending);
        assert_eq!(err.message, "Already approved");

        let err: AppError = ClientError::Unauthorized.into();
        assert_eq!(err.code, ErrorCode::SessionExpired);
    }
}
