//! Account persistence.
//!
//! [`AccountStore`] is the only owner of account records. Handlers and the
//! authorization guard reach accounts exclusively through it, as a shared
//! `Arc<dyn AccountStore>`.
//!
//! Implementations must be safe to call from many request tasks at once and must
//! not rely on in-process locking for correctness across service instances:
//! account-number uniqueness is the backing engine's job.

use async_trait::async_trait;
use rand::Rng;

use crate::models::account::{Account, NewAccount};

pub mod memory;
pub mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

/// How many fresh account numbers to try before giving up on a create.
pub const MAX_NUMBER_ATTEMPTS: usize = 5;

/// Errors returned by an [`AccountStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Account {0} not found")]
    NotFound(String),

    /// Every generated account number collided with an existing one.
    #[error("Could not allocate a unique account number")]
    NumberExhausted,

    /// Connectivity loss, constraint violation or any other engine failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn account_id(id: i64) -> Self {
        Self::NotFound(format!("id {id}"))
    }

    pub fn account_number(number: i64) -> Self {
        Self::NotFound(format!("number {number}"))
    }
}

/// Persistence contract for account records.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Persist a new account, assigning its id, account number and creation time.
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Remove an account.
    ///
    /// Deleting an id that does not exist is not an error.
    async fn delete_account(&self, id: i64) -> Result<(), StoreError>;

    /// Reserved for future mutable fields. Nothing is written today; the call
    /// only confirms the account still exists.
    async fn update_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Every account, in no particular order.
    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError>;

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError>;

    /// Round-trip to the backing engine.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Draw a random eight-digit account number.
///
/// Collisions are resolved by the store retrying against its uniqueness
/// constraint, never by checking first.
pub fn generate_account_number() -> i64 {
    rand::rng().random_range(10_000_000..100_000_000)
}
