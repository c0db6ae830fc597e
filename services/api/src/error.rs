//! Custom error types for the attendance API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the attendance API. Every variant renders as a
/// machine-readable kind plus a human-readable message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid bearer token, or bad credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Caller lacks the required role
    #[error("No permission")]
    Forbidden,

    /// Missing or malformed input, rejected before any store access
    #[error("{0}")]
    Validation(String),

    /// Business-rule violation (e.g. a live session already exists)
    #[error("{0}")]
    Conflict(String),

    /// Referenced entity absent
    #[error("{0}")]
    NotFound(String),

    /// Fingerprint credential does not map to a known student
    #[error("Unknown fingerprint")]
    UnknownCredential,

    /// Referenced session does not exist or is not live
    #[error("Session is not live")]
    InvalidSession,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Underlying store unavailable or query failed
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::Validation(_) => "validation",
            ApiError::Conflict(_) => "conflict",
            ApiError::NotFound(_) => "not_found",
            ApiError::UnknownCredential => "unknown_credential",
            ApiError::InvalidSession => "invalid_session",
            ApiError::InternalServerError => "server_error",
            ApiError::Database(_) => "storage",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnknownCredential => StatusCode::NOT_FOUND,
            ApiError::InvalidSession => StatusCode::FORBIDDEN,
            ApiError::InternalServerError | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));

        (self.status_code(), body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::InvalidSession.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_kind_is_machine_readable() {
        assert_eq!(ApiError::UnknownCredential.kind(), "unknown_credential");
        assert_eq!(ApiError::Conflict("dup".into()).kind(), "conflict");
    }
}
