//! Opaque session issuer
//!
//! Mints unguessable random tokens; storage and cookie handling belong to
//! the session middleware, which is outside the verification subsystem.

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;

use rl_core::domain::entities::account::Account;
use rl_core::errors::DomainResult;
use rl_core::services::identity::{Session, SessionIssuer};

/// Number of random bytes per token (hex-encoded to 64 characters)
const TOKEN_BYTES: usize = 32;

/// Session issuer producing opaque random hex tokens
pub struct OpaqueSessionIssuer;

impl OpaqueSessionIssuer {
    /// Create a new issuer
    pub fn new() -> Self {
        Self
    }
}

impl Default for OpaqueSessionIssuer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionIssuer for OpaqueSessionIssuer {
    async fn issue(&self, account: &Account) -> DomainResult<Session> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);

        Ok(Session {
            token: hex::encode(bytes),
            account_id: account.id,
            issued_at: Utc::now(),
        })
    }
}
