//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to the store, hasher or token issuer
//! 3. Returns HTTP response (JSON, status code)

/// Account management endpoints
pub mod accounts;
/// Unsupported-method responses
pub mod fallback;
/// Service health endpoint
pub mod health;
/// Token exchange for existing accounts
pub mod login;
/// Transfer echo endpoint
pub mod transfer;
