//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, AppError>`.
//!
//! Business failures (validation, missing entities, state errors) respond
//! with `200 OK` and `{success:false, error:...}` - the envelope flag, not
//! the HTTP status, is the business contract. Infrastructure failures
//! respond with a generic message; driver details never reach the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::ApiResponse;
use crate::services::auth::AuthError;
use crate::services::orders::OrderError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Caller is not authenticated.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Request is well-formed but semantically invalid.
    #[error("{0}")]
    Validation(String),

    /// Malformed request or unknown action.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a server fault rather than a business outcome.
    const fn is_server_fault(&self) -> bool {
        match self {
            Self::Repository(_) | Self::Internal(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_) | AuthError::PasswordHash
            ),
            Self::Order(err) => matches!(err, OrderError::Repository(_)),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server faults to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = if self.is_server_fault() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            match &self {
                Self::BadRequest(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::OK,
            }
        };

        // Don't expose internal error details to clients
        let message = if self.is_server_fault() {
            "Internal server error".to_string()
        } else {
            match &self {
                Self::Auth(err) => err.to_string(),
                Self::Order(err) => err.to_string(),
                other => other.to_string(),
            }
        };

        let Json(body) = ApiResponse::failure(message);
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_business_failures_are_flag_signaled() {
        // Business outcomes keep 200; the envelope flag carries the failure.
        assert_eq!(
            get_status(AppError::NotFound("Product not found".to_string())),
            StatusCode::OK
        );
        assert_eq!(
            get_status(AppError::Validation("Field 'email' is required".to_string())),
            StatusCode::OK
        );
        assert_eq!(get_status(AppError::AuthenticationRequired), StatusCode::OK);
    }

    #[test]
    fn test_transport_errors_use_http_status() {
        assert_eq!(
            get_status(AppError::BadRequest("Invalid action".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let response = AppError::Internal("connection pool exhausted".to_string());
        let rendered = response.to_string();
        assert!(rendered.contains("connection pool exhausted"));
        // The response body replaces the detail with a generic message; the
        // detail only reaches logs and Sentry.
        let http = AppError::Internal("connection pool exhausted".to_string()).into_response();
        assert_eq!(http.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
