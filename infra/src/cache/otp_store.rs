//! Redis-backed OTP store
//!
//! Challenges are stored as JSON blobs under `otp:challenge:{role}:{mobile}`
//! with a TTL matching the challenge expiry, so Redis reclaims abandoned
//! challenges on its own. Expiry is still re-checked on every read: the
//! entity's clock, not the key's TTL, is authoritative.
//!
//! Redis read-modify-write sequences are not atomic by themselves, and the
//! attempt-then-compare ordering must be. Each (mobile, role) key gets an
//! in-process async mutex; the verification endpoints of one deployment
//! run in one process, so this is the per-key critical section.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use rl_core::domain::entities::account::Role;
use rl_core::domain::entities::otp_challenge::{AttemptOutcome, OtpChallenge};
use rl_core::errors::{DomainError, DomainResult, VerificationError};
use rl_core::repositories::otp::{AttemptReport, OtpStore};
use rl_shared::utils::phone::mask_mobile;

use super::redis_client::RedisClient;

/// Redis key prefix for challenge storage
const CHALLENGE_KEY_PREFIX: &str = "otp:challenge";

/// Redis-backed implementation of [`OtpStore`]
pub struct RedisOtpStore {
    client: RedisClient,
    ttl_minutes: i64,
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RedisOtpStore {
    /// Create a store with the default 5-minute challenge TTL
    pub fn new(client: RedisClient) -> Self {
        Self::with_ttl(client, rl_core::domain::entities::otp_challenge::DEFAULT_TTL_MINUTES)
    }

    /// Create a store with a custom challenge TTL in minutes
    pub fn with_ttl(client: RedisClient, ttl_minutes: i64) -> Self {
        Self {
            client,
            ttl_minutes,
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    fn format_key(mobile: &str, role: Role) -> String {
        format!("{}:{}:{}", CHALLENGE_KEY_PREFIX, role.as_str(), mobile)
    }

    /// The per-key critical-section guard
    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock().await;
        Arc::clone(locks.entry(key.to_string()).or_default())
    }

    async fn load(&self, key: &str) -> DomainResult<Option<OtpChallenge>> {
        let raw = self.client.get(key).await.map_err(internal)?;
        match raw {
            Some(json) => {
                let challenge: OtpChallenge =
                    serde_json::from_str(&json).map_err(|e| DomainError::Internal {
                        message: format!("Failed to deserialize challenge: {}", e),
                    })?;
                Ok(Some(challenge))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, challenge: &OtpChallenge) -> DomainResult<()> {
        let json = serde_json::to_string(challenge).map_err(|e| DomainError::Internal {
            message: format!("Failed to serialize challenge: {}", e),
        })?;

        let ttl = challenge.seconds_until_expiry(Utc::now()).max(1) as u64;
        self.client
            .set_with_expiry(key, &json, ttl)
            .await
            .map_err(internal)
    }
}

fn internal(e: crate::InfrastructureError) -> DomainError {
    DomainError::Internal {
        message: e.to_string(),
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn issue(&self, mobile: &str, role: Role) -> DomainResult<OtpChallenge> {
        let key = Self::format_key(mobile, role);
        let guard = self.key_lock(&key).await;
        let _held = guard.lock().await;

        let challenge = OtpChallenge::with_ttl(mobile.to_string(), role, self.ttl_minutes);
        self.save(&key, &challenge).await?;

        debug!(
            mobile = %mask_mobile(mobile),
            role = %role,
            event = "challenge_issued",
            "Stored OTP challenge in Redis"
        );

        Ok(challenge)
    }

    async fn peek(&self, mobile: &str, role: Role) -> DomainResult<Option<OtpChallenge>> {
        let key = Self::format_key(mobile, role);
        let now = Utc::now();
        Ok(self.load(&key).await?.filter(|c| !c.is_expired(now)))
    }

    async fn attempt_verify(
        &self,
        mobile: &str,
        role: Role,
        code: &str,
    ) -> DomainResult<AttemptReport> {
        let key = Self::format_key(mobile, role);
        let guard = self.key_lock(&key).await;
        let _held = guard.lock().await;

        let mut challenge = self
            .load(&key)
            .await?
            .ok_or(VerificationError::ChallengeNotFound)?;

        let outcome = challenge.register_attempt(code, Utc::now());

        // Persist the charged attempt (and consumption) before reporting.
        match outcome {
            AttemptOutcome::Matched | AttemptOutcome::Mismatch { .. } => {
                self.save(&key, &challenge).await?;
            }
            _ => {}
        }

        match outcome {
            AttemptOutcome::Matched => Ok(AttemptReport {
                matched: true,
                remaining_attempts: challenge.remaining_attempts(),
            }),
            AttemptOutcome::Mismatch { remaining_attempts } => Ok(AttemptReport {
                matched: false,
                remaining_attempts,
            }),
            AttemptOutcome::Exhausted => Err(VerificationError::AttemptsExhausted.into()),
            AttemptOutcome::Expired => Err(VerificationError::ChallengeExpired.into()),
            AttemptOutcome::Consumed => Err(VerificationError::ChallengeNotFound.into()),
        }
    }

    async fn clear(&self, mobile: &str, role: Role) -> DomainResult<()> {
        let key = Self::format_key(mobile, role);
        self.client.delete(&key).await.map_err(internal)?;

        // Drop the key's lock entry too; abandoned entries would otherwise
        // accumulate one per mobile ever seen.
        let mut locks = self.key_locks.lock().await;
        locks.remove(&key);

        Ok(())
    }

    async fn purge_expired(&self) -> DomainResult<usize> {
        // Redis TTLs already reclaim expired challenges; the sweep only
        // trims the lock map.
        let mut locks = self.key_locks.lock().await;
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Ok(before - locks.len())
    }
}
