//! Data models representing database entities and API payloads.

/// Bank account model
pub mod account;
/// Login credentials and issued token
pub mod login;
/// Transfer request (echo only)
pub mod transfer;
