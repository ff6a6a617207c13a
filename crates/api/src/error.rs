//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`. Every response body carries a stable `code` so
//! clients can branch without parsing messages.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Malformed or out-of-range input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Delete blocked by referential protection. An expected business
    /// condition, reported as 405 rather than a server fault.
    #[error("Protected: {0}")]
    Protected(String),

    /// No valid credentials presented.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials valid but insufficient for the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Structured error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Database(RepositoryError::InvalidReference(_)) | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Database(RepositoryError::Protected(_)) | Self::Protected(_) => {
                StatusCode::METHOD_NOT_ALLOWED
            }
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => "not_found",
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => "conflict",
            Self::Database(RepositoryError::InvalidReference(_)) | Self::Validation(_) => {
                "validation_error"
            }
            Self::Database(RepositoryError::Protected(_)) | Self::Protected(_) => "protected",
            Self::Database(_) | Self::Internal(_) => "internal_error",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Internal(_)
                | Self::Database(
                    RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
                )
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let code = self.code();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_)
            | Self::Database(RepositoryError::Database(_) | RepositoryError::DataCorruption(_)) => {
                "Internal server error".to_owned()
            }
            Self::Database(RepositoryError::NotFound) => "Not found".to_owned(),
            Self::Database(
                RepositoryError::Conflict(msg)
                | RepositoryError::InvalidReference(msg)
                | RepositoryError::Protected(msg),
            ) => msg.clone(),
            Self::Validation(msg)
            | Self::Protected(msg)
            | Self::Conflict(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg) => msg.clone(),
            Self::NotFound(what) => format!("Not found: {what}"),
        };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_owned());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::Validation("quantity must be at least 1".to_owned());
        assert_eq!(
            err.to_string(),
            "Validation error: quantity must be at least 1"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::NotFound("x".to_owned()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("x".to_owned()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Protected("x".to_owned()).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::Conflict("x".to_owned()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Unauthorized("x".to_owned()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".to_owned()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Internal("x".to_owned()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_errors_map_to_http() {
        assert_eq!(
            AppError::from(RepositoryError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::Conflict("dup".to_owned())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(RepositoryError::InvalidReference("bad fk".to_owned())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(RepositoryError::Protected("has children".to_owned())).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_stable_codes() {
        assert_eq!(AppError::Protected("x".to_owned()).code(), "protected");
        assert_eq!(
            AppError::Validation("x".to_owned()).code(),
            "validation_error"
        );
        assert_eq!(
            AppError::from(RepositoryError::NotFound).code(),
            "not_found"
        );
        assert_eq!(
            AppError::from(RepositoryError::InvalidReference("bad fk".to_owned())).code(),
            "validation_error"
        );
        assert_eq!(
            AppError::from(RepositoryError::Protected("has children".to_owned())).code(),
            "protected"
        );
    }
}
