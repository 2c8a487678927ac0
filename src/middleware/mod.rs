//! HTTP middleware components.
//!
//! Middleware run before route handlers and can short-circuit a request
//! without the handler ever seeing it.

/// Token ownership guard for account-scoped routes
pub mod auth;
