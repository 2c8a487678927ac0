//! PostgreSQL-backed [`AccountStore`].
//!
//! Every statement binds user-supplied values as parameters, and every mutation
//! is a single statement, so a cancelled request never leaves a half-written row.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};

use super::{AccountStore, MAX_NUMBER_ATTEMPTS, StoreError, generate_account_number};
use crate::models::account::{Account, NewAccount};

/// Name of the unique constraint on `accounts.number` (see migrations).
const NUMBER_CONSTRAINT: &str = "accounts_number_key";

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, encrypted_password, number, balance, created_at";

/// Connections shared by all request tasks. Each store call holds one for a
/// single statement.
const MAX_CONNECTIONS: u32 = 5;

/// Waiting longer than this for a free connection is a storage failure.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    ///
    /// Fails fast when the server is unreachable or rejects the credentials, so
    /// a misconfigured service never starts serving.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Bring the `accounts` schema up to date.
    ///
    /// Applied migrations are recorded in `_sqlx_migrations`; rerunning is a no-op.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

/// True when the error is a collision on the account-number constraint.
fn is_number_collision(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => {
            db_error.is_unique_violation() && db_error.constraint() == Some(NUMBER_CONSTRAINT)
        }
        _ => false,
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    /// Insert the account with a freshly drawn number.
    ///
    /// The database assigns `id` and `created_at`. If the number is already
    /// taken, the insert fails on the unique constraint and another number is
    /// drawn, up to [`MAX_NUMBER_ATTEMPTS`] times.
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let query = format!(
            "INSERT INTO accounts (first_name, last_name, encrypted_password, number, balance) \
             VALUES ($1, $2, $3, $4, 0) \
             RETURNING {ACCOUNT_COLUMNS}"
        );

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let number = generate_account_number();

            let result = sqlx::query_as::<_, Account>(&query)
                .bind(&account.first_name)
                .bind(&account.last_name)
                .bind(&account.encrypted_password)
                .bind(number)
                .fetch_one(&self.pool)
                .await;

            match result {
                Ok(created) => return Ok(created),
                Err(error) if is_number_collision(&error) => {
                    tracing::warn!(attempt, "Account number collision, drawing another");
                }
                Err(error) => return Err(error.into()),
            }
        }

        Err(StoreError::NumberExhausted)
    }

    async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(id, rows = result.rows_affected(), "Account delete executed");
        Ok(())
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
            .bind(account.id)
            .fetch_one(&self.pool)
            .await?;

        if exists {
            Ok(())
        } else {
            Err(StoreError::account_id(account.id))
        }
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let accounts =
            sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts"))
                .fetch_all(&self.pool)
                .await?;

        Ok(accounts)
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::account_id(id))
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE number = $1"
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::account_number(number))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        // Verify database connectivity with simple query
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(first_name: &str) -> NewAccount {
        NewAccount {
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            encrypted_password: "$2b$04$not-a-real-hash".to_string(),
        }
    }

    async fn insert_with_number(pool: &PgPool, number: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO accounts (first_name, last_name, encrypted_password, number) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind("Fixed")
        .bind("Number")
        .bind("$2b$04$not-a-real-hash")
        .bind(number)
        .execute(pool)
        .await
        .map(|_| ())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL server in DATABASE_URL"]
    async fn create_then_fetch_round_trips(pool: PgPool) {
        let store = PgAccountStore::new(pool);

        let created = store.create_account(new_account("A")).await.unwrap();

        assert!(created.id > 0);
        assert!((10_000_000..100_000_000).contains(&created.number));
        assert_eq!(created.balance, 0);
        assert_eq!(created.first_name, "A");
        assert_eq!(created.encrypted_password, "$2b$04$not-a-real-hash");

        let by_id = store.get_account_by_id(created.id).await.unwrap();
        let by_number = store.get_account_by_number(created.number).await.unwrap();
        assert_eq!(by_id, created);
        assert_eq!(by_number, created);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL server in DATABASE_URL"]
    async fn repeated_get_returns_identical_rows(pool: PgPool) {
        let store = PgAccountStore::new(pool);
        let created = store.create_account(new_account("A")).await.unwrap();

        let first = store.get_account_by_id(created.id).await.unwrap();
        let second = store.get_account_by_id(created.id).await.unwrap();

        assert_eq!(first, second);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL server in DATABASE_URL"]
    async fn listing_returns_every_row(pool: PgPool) {
        let store = PgAccountStore::new(pool);
        let first = store.create_account(new_account("A")).await.unwrap();
        let second = store.create_account(new_account("B")).await.unwrap();

        let accounts = store.get_accounts().await.unwrap();

        assert_eq!(accounts.len(), 2);
        assert!(accounts.contains(&first));
        assert!(accounts.contains(&second));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL server in DATABASE_URL"]
    async fn missing_rows_are_not_found(pool: PgPool) {
        let store = PgAccountStore::new(pool);

        assert!(matches!(
            store.get_account_by_id(9_999_999).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.get_account_by_number(12_345_678).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL server in DATABASE_URL"]
    async fn delete_is_silent_for_missing_ids(pool: PgPool) {
        let store = PgAccountStore::new(pool);
        let created = store.create_account(new_account("A")).await.unwrap();

        store.delete_account(created.id).await.unwrap();
        store.delete_account(created.id).await.unwrap();
        store.delete_account(9_999_999).await.unwrap();

        assert!(matches!(
            store.get_account_by_id(created.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL server in DATABASE_URL"]
    async fn update_requires_existing_account(pool: PgPool) {
        let store = PgAccountStore::new(pool);
        let created = store.create_account(new_account("A")).await.unwrap();

        store.update_account(&created).await.unwrap();
        store.delete_account(created.id).await.unwrap();

        assert!(matches!(
            store.update_account(&created).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL server in DATABASE_URL"]
    async fn duplicate_number_is_detected_as_collision(pool: PgPool) {
        insert_with_number(&pool, 12_345_678).await.unwrap();

        let error = insert_with_number(&pool, 12_345_678).await.unwrap_err();

        assert!(is_number_collision(&error));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL server in DATABASE_URL"]
    async fn other_failures_are_not_collisions(pool: PgPool) {
        let error = sqlx::query("SELECT * FROM no_such_table")
            .execute(&pool)
            .await
            .unwrap_err();

        assert!(!is_number_collision(&error));
        assert!(!is_number_collision(&sqlx::Error::RowNotFound));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL server in DATABASE_URL"]
    async fn ping_reaches_the_server(pool: PgPool) {
        PgAccountStore::new(pool).ping().await.unwrap();
    }
}
