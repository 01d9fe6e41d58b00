//! Account repository trait defining the interface for account persistence.
//!
//! The verification subsystem only needs existence checks and the
//! find-or-create steps of the login/register branch; everything else the
//! marketplace knows about accounts lives behind other services.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::account::{Account, Role};
use crate::errors::DomainError;

/// Repository for [`Account`] persistence operations, keyed by
/// (mobile, role)
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by mobile number and role
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account for the given mobile+role
    /// * `Err(DomainError)` - Storage error
    async fn find_by_mobile(
        &self,
        mobile: &str,
        role: Role,
    ) -> Result<Option<Account>, DomainError>;

    /// Find an account by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Check whether an account exists for the given mobile+role
    async fn exists_by_mobile(&self, mobile: &str, role: Role) -> Result<bool, DomainError>;

    /// Create a new account
    ///
    /// # Returns
    /// * `Ok(Account)` - The created account
    /// * `Err(DomainError)` - Creation failed (e.g. mobile already registered)
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Update an existing account
    async fn update(&self, account: Account) -> Result<Account, DomainError>;
}
