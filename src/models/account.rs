//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: Database entity representing an account
//! - `NewAccount`: Fields supplied by the caller when persisting an account
//! - `CreateAccountRequest`: Request body for creating accounts
//! - `AccountResponse`: Response body returned to clients
//! - `DeletedResponse`: Response body for account deletion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents an account record from the database.
///
/// # Identity
///
/// `id` is the storage primary key. `number` is the identity bound into
/// authorization tokens. Both are assigned by the store when the account is
/// created and never change afterwards.
///
/// This type is deliberately not `Serialize`: it carries the password hash,
/// and only [`AccountResponse`] leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    pub id: i64,

    pub first_name: String,

    pub last_name: String,

    /// bcrypt hash of the account password
    pub encrypted_password: String,

    /// Externally meaningful account number
    pub number: i64,

    /// Current balance in minor currency units (cents)
    pub balance: i64,

    pub created_at: DateTime<Utc>,
}

/// An account that has not been persisted yet.
///
/// The store fills in `id`, `number`, `balance` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub encrypted_password: String,
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "firstname": "Ada",
///   "lastname": "Lovelace",
///   "password": "correct horse battery staple"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(rename = "firstname")]
    pub first_name: String,

    #[serde(rename = "lastname")]
    pub last_name: String,

    /// Plaintext password, hashed before it reaches the store
    pub password: String,
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "firstname": "Ada",
///   "lastname": "Lovelace",
///   "number": 48213377,
///   "balance": 0,
///   "createdAt": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountResponse {
    pub id: i64,

    #[serde(rename = "firstname")]
    pub first_name: String,

    #[serde(rename = "lastname")]
    pub last_name: String,

    pub number: i64,

    pub balance: i64,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Convert database Account to API AccountResponse.
///
/// This transformation drops the password hash.
impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

/// Response body for `DELETE /account/{id}`.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_never_carries_password_hash() {
        let account = Account {
            id: 7,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            encrypted_password: "$2b$04$hash".to_string(),
            number: 12345678,
            balance: 0,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(AccountResponse::from(account)).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object["id"], 7);
        assert_eq!(object["firstname"], "A");
        assert_eq!(object["lastname"], "B");
        assert_eq!(object["number"], 12345678);
        assert!(object.contains_key("createdAt"));
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("encrypted_password"));
        assert!(!json.to_string().contains("$2b$04$hash"));
    }
}
