//! Error types for autonomixd

use autonomix_registry::RegistryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// Registry construction failed
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Caller identity missing
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Client exceeded its request quota
    #[error("Too many requests")]
    TooManyRequests,

    /// Upstream document could not be loaded
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Registry rejected the operation
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

fn registry_status(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::TokenNonexistent(_) => StatusCode::NOT_FOUND,
        RegistryError::NotAuthorized { .. } | RegistryError::AccessControlUnauthorized { .. } => {
            StatusCode::FORBIDDEN
        }
        RegistryError::InvalidMetadata { .. } | RegistryError::InvalidDeltaMin => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RegistryError::EnforcedPause
        | RegistryError::ExpectedPause
        | RegistryError::IncorrectOwner { .. }
        | RegistryError::IdExhausted => StatusCode::CONFLICT,
        RegistryError::ZeroAddress
        | RegistryError::OutOfBoundsIndex { .. }
        | RegistryError::BadConfirmation => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::TooManyRequests => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Registry(err) => (registry_status(err), err.code()),
        };

        let details = match &self {
            ApiError::Registry(RegistryError::InvalidMetadata { field }) => {
                Some(serde_json::json!({ "field": field }))
            }
            ApiError::Registry(RegistryError::OutOfBoundsIndex { index, len }) => {
                Some(serde_json::json!({ "index": index, "len": len }))
            }
            _ => None,
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;
    use autonomix_types::AgentId;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("test".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Unauthorized("test".to_string())
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::BadGateway("test".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_registry_error_status_codes() {
        let cases = [
            (RegistryError::TokenNonexistent(AgentId::new(9)), StatusCode::NOT_FOUND),
            (RegistryError::EnforcedPause, StatusCode::CONFLICT),
            (RegistryError::InvalidDeltaMin, StatusCode::UNPROCESSABLE_ENTITY),
            (RegistryError::ZeroAddress, StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
