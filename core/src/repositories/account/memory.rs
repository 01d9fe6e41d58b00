//! In-memory account repository for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::{Account, Role};
use crate::errors::{AccountError, DomainError};

use super::trait_::AccountRepository;

/// In-memory implementation of [`AccountRepository`]
pub struct MemoryAccountRepository {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl MemoryAccountRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_mobile(
        &self,
        mobile: &str,
        role: Role,
    ) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.mobile == mobile && a.role == role)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn exists_by_mobile(&self, mobile: &str, role: Role) -> Result<bool, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .any(|a| a.mobile == mobile && a.role == role))
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts
            .values()
            .any(|a| a.mobile == account.mobile && a.role == account.role)
        {
            return Err(AccountError::AccountConflict.into());
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if !accounts.contains_key(&account.id) {
            return Err(AccountError::AccountNotFound.into());
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }
}
