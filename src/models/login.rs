//! Login request and response types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account number printed on the account, not the storage id
    pub number: i64,

    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub number: i64,

    /// Token to present in the `x-jwt-token` header
    pub token: String,
}
