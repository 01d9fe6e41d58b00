//! Session issuer collaborator trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::DomainResult;

/// An issued session: an opaque token bound to an account
///
/// Cookie plumbing and expiry policy live with the issuer implementation;
/// the verification subsystem only carries the token back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session token
    pub token: String,
    /// The account the session belongs to
    pub account_id: Uuid,
    /// When the session was issued
    pub issued_at: DateTime<Utc>,
}

/// Trait for the session-issuing collaborator
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Issue a session for an account
    async fn issue(&self, account: &Account) -> DomainResult<Session>;
}
