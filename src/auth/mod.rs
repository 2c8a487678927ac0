//! Credentials and authorization tokens.
//!
//! - [`password`]: bcrypt hashing off the request task
//! - [`token`]: issuing and validating signed account tokens

pub mod password;
pub mod token;

/// Request and response header carrying the authorization token.
pub const TOKEN_HEADER: &str = "x-jwt-token";
