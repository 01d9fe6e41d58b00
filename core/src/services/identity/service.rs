//! Account resolution service: the login-or-register step
//!
//! Both paths require the caller's mobile to hold a consumed, unexpired
//! challenge, and both spend that challenge on success so a single
//! verification can authorize exactly one account action.

use std::sync::Arc;
use tracing;

use rl_shared::utils::phone::mask_mobile;

use crate::domain::entities::account::{Account, Role};
use crate::errors::{AccountError, DomainResult, VerificationError};
use crate::repositories::account::AccountRepository;
use crate::repositories::otp::OtpStore;

use super::session::{Session, SessionIssuer};

/// Result of a successful login or registration
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// The resolved account
    pub account: Account,
    /// The issued session
    pub session: Session,
    /// Whether the account was created by this call
    pub registered: bool,
}

/// Identity service resolving a verified mobile into an account session
pub struct IdentityService<O, A, S>
where
    O: OtpStore,
    A: AccountRepository,
    S: SessionIssuer,
{
    /// Challenge store, shared with the verification service
    otp_store: Arc<O>,
    /// Account repository
    accounts: Arc<A>,
    /// Session issuer collaborator
    sessions: Arc<S>,
}

impl<O, A, S> IdentityService<O, A, S>
where
    O: OtpStore,
    A: AccountRepository,
    S: SessionIssuer,
{
    /// Create a new identity service
    pub fn new(otp_store: Arc<O>, accounts: Arc<A>, sessions: Arc<S>) -> Self {
        Self {
            otp_store,
            accounts,
            sessions,
        }
    }

    /// Confirms the mobile holds a consumed, unexpired challenge.
    ///
    /// Absent, expired, or not-yet-consumed challenges all refuse: the
    /// account operation may only ride on a verification that actually
    /// happened in this flow.
    async fn require_verified(&self, mobile: &str, role: Role) -> DomainResult<()> {
        let challenge = self.otp_store.peek(mobile, role).await?;
        match challenge {
            Some(c) if c.consumed => Ok(()),
            _ => {
                tracing::warn!(
                    mobile = %mask_mobile(mobile),
                    role = %role,
                    event = "account_action_unverified",
                    "Account action attempted without a verified challenge"
                );
                Err(VerificationError::ChallengeNotFound.into())
            }
        }
    }

    /// Log in to the existing account for a verified mobile
    ///
    /// # Returns
    ///
    /// * `Ok(AuthOutcome)` - Session issued; the challenge is spent
    /// * `Err(AccountNotFound)` - No account: the flow's register branch.
    ///   The challenge is left intact so registration can proceed on the
    ///   same verification.
    /// * `Err(ChallengeNotFound)` - The mobile is not OTP-verified
    pub async fn login(&self, mobile: &str, role: Role) -> DomainResult<AuthOutcome> {
        self.require_verified(mobile, role).await?;

        let account = match self.accounts.find_by_mobile(mobile, role).await? {
            Some(account) => account,
            None => return Err(AccountError::AccountNotFound.into()),
        };

        let mut account = account;
        account.touch_login();
        let account = self.accounts.update(account).await?;

        // The verified challenge is spent: it cannot authorize a second
        // account action.
        self.otp_store.clear(mobile, role).await?;

        let session = self.sessions.issue(&account).await?;

        tracing::info!(
            mobile = %mask_mobile(mobile),
            role = %role,
            account_id = %account.id,
            event = "login",
            "Account logged in"
        );

        Ok(AuthOutcome {
            account,
            session,
            registered: false,
        })
    }

    /// Register a new account for a verified mobile
    ///
    /// # Returns
    ///
    /// * `Ok(AuthOutcome)` - Account created and session issued; the
    ///   challenge is spent
    /// * `Err(AccountConflict)` - An account already exists for the key
    /// * `Err(ChallengeNotFound)` - The mobile is not OTP-verified
    pub async fn register(
        &self,
        mobile: &str,
        role: Role,
        full_name: &str,
    ) -> DomainResult<AuthOutcome> {
        self.require_verified(mobile, role).await?;

        if self.accounts.exists_by_mobile(mobile, role).await? {
            return Err(AccountError::AccountConflict.into());
        }

        let account = self
            .accounts
            .create(Account::new(
                mobile.to_string(),
                role,
                full_name.to_string(),
            ))
            .await?;

        self.otp_store.clear(mobile, role).await?;

        let session = self.sessions.issue(&account).await?;

        tracing::info!(
            mobile = %mask_mobile(mobile),
            role = %role,
            account_id = %account.id,
            event = "register",
            "Account registered"
        );

        Ok(AuthOutcome {
            account,
            session,
            registered: true,
        })
    }
}
