//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound
            | Self::RequestNotFound
            | Self::UserNotFound
            | Self::DepartmentNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists
            | Self::RequestNotPending
            | Self::EmailAlreadyExists
            | Self::DepartmentNameExists => StatusCode::CONFLICT,

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::SessionExpired => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied
            | Self::RoleRequired
            | Self::AdminRequired
            | Self::TemplateDisabled => StatusCode::FORBIDDEN,

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::FileUnreadable => StatusCode::BAD_REQUEST,

            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,
            Self::NetworkError => StatusCode::BAD_GATEWAY,

            Self::Unknown
            | Self::InternalError
            | Self::ConfigError
            | Self::StorageError
            | Self::ExportFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Best-effort mapping from an HTTP status to a generic error code.
    ///
    /// Used when the backend answers with a non-2xx status and a body that is
    /// not an error envelope.
    pub fn from_http_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationFailed,
            StatusCode::UNAUTHORIZED => Self::NotAuthenticated,
            StatusCode::FORBIDDEN => Self::PermissionDenied,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::AlreadyExists,
            StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => Self::TimeoutError,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => Self::NetworkError,
            s if s.is_success() => Self::Success,
            _ => Self::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::RequestNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::InvalidCredentials.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::FileUnreadable.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::RequestNotPending.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_from_http_status() {
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::UNAUTHORIZED),
            ErrorCode::NotAuthenticated
        );
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::IM_A_TEAPOT),
            ErrorCode::InternalError
        );
    }
}
