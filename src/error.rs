//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    auth::{password::PasswordError, token::TokenError},
    store::StoreError,
};

/// Message returned for every authorization failure.
pub const PERMISSION_DENIED: &str = "Permission denied";

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body could not be decoded.
    ///
    /// Returns HTTP 400 with the decoder's message.
    #[error("{0}")]
    Decode(String),

    /// Request was well-formed but violates a business rule.
    ///
    /// Returns HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Any authorization failure.
    ///
    /// Returns HTTP 403 with a constant message, whatever the cause.
    #[error("Permission denied")]
    PermissionDenied,

    /// Returns HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Store failure other than a missing record.
    ///
    /// Returns HTTP 400; the underlying message is logged, not returned.
    #[error("Storage error: {0}")]
    Storage(StoreError),

    /// Returns HTTP 400; the underlying message is logged, not returned.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token could not be minted.
    ///
    /// Returns HTTP 400; the underlying message is logged, not returned.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Returns HTTP 400.
    #[error("method not allowed {0}")]
    MethodNotAllowed(Method),

    /// Request exceeded its deadline.
    ///
    /// Returns HTTP 408.
    #[error("request timed out")]
    Timeout,
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(what) => AppError::NotFound(format!("Account {what} not found")),
            other => AppError::Storage(other),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// { "error": "Human-readable error message" }
/// ```
///
/// # Status Code Mapping
///
/// - `PermissionDenied` → 403 Forbidden
/// - `NotFound` → 404 Not Found
/// - `Timeout` → 408 Request Timeout
/// - everything else → 400 Bad Request
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Decode(ref msg) | AppError::Validation(ref msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::PermissionDenied => (StatusCode::FORBIDDEN, PERMISSION_DENIED.to_string()),
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::MethodNotAllowed(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Timeout => (StatusCode::REQUEST_TIMEOUT, self.to_string()),
            AppError::Storage(ref error) => {
                tracing::error!(%error, "Store operation failed");
                (StatusCode::BAD_REQUEST, "storage error".to_string())
            }
            AppError::Password(ref error) => {
                tracing::error!(%error, "Password hashing failed");
                (StatusCode::BAD_REQUEST, "password processing failed".to_string())
            }
            AppError::Token(ref error) => {
                tracing::error!(%error, "Token issuing failed");
                (StatusCode::BAD_REQUEST, "token processing failed".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn permission_denied_is_uniform() {
        let (status, body) = render(AppError::PermissionDenied).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Permission denied" }));
    }

    #[tokio::test]
    async fn storage_details_are_not_leaked() {
        let error = AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        let (status, body) = render(error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "storage error" }));
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let (status, body) = render(StoreError::account_id(5).into()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Account id 5 not found" }));
    }

    #[tokio::test]
    async fn method_not_allowed_names_the_method() {
        let (status, body) = render(AppError::MethodNotAllowed(Method::DELETE)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "method not allowed DELETE" }));
    }

    #[tokio::test]
    async fn timeout_is_request_timeout() {
        let (status, body) = render(AppError::Timeout).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body, json!({ "error": "request timed out" }));
    }
}
