//! In-process [`AccountStore`] used by tests and local experiments.
//!
//! Mirrors the PostgreSQL store's observable behavior: sequential ids, unique
//! random account numbers, silent deletes of missing rows.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AccountStore, MAX_NUMBER_ATTEMPTS, StoreError, generate_account_number};
use crate::models::account::{Account, NewAccount};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    accounts: BTreeMap<i64, Account>,
}

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Inner>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;

        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let number = generate_account_number();
            if inner.accounts.values().any(|a| a.number == number) {
                continue;
            }

            inner.last_id += 1;
            let created = Account {
                id: inner.last_id,
                first_name: account.first_name,
                last_name: account.last_name,
                encrypted_password: account.encrypted_password,
                number,
                balance: 0,
                created_at: Utc::now(),
            };
            inner.accounts.insert(created.id, created.clone());
            return Ok(created);
        }

        Err(StoreError::NumberExhausted)
    }

    async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        self.inner.write().await.accounts.remove(&id);
        Ok(())
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        if self.inner.read().await.accounts.contains_key(&account.id) {
            Ok(())
        } else {
            Err(StoreError::account_id(account.id))
        }
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.inner.read().await.accounts.values().cloned().collect())
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError> {
        self.inner
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::account_id(id))
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
        self.inner
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.number == number)
            .cloned()
            .ok_or_else(|| StoreError::account_number(number))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
