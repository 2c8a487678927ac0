//! Responses for requests that match a path but not a method.

use axum::http::Method;

use crate::error::AppError;

/// Reject an unsupported method on a known path with a 400.
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}
