//! In-memory OTP store used by tests and the development server.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use rl_shared::utils::phone::mask_mobile;

use crate::domain::entities::account::Role;
use crate::domain::entities::otp_challenge::{AttemptOutcome, OtpChallenge};
use crate::errors::{DomainResult, VerificationError};

use super::trait_::{AttemptReport, OtpStore};

type ChallengeKey = (String, Role);

/// In-memory implementation of [`OtpStore`]
///
/// The single map mutex is the per-key critical section: two racing
/// verification attempts against the same challenge are serialized, so the
/// attempt-then-compare sequence is atomic.
pub struct MemoryOtpStore {
    challenges: Mutex<HashMap<ChallengeKey, OtpChallenge>>,
    ttl_minutes: i64,
}

impl MemoryOtpStore {
    /// Create a store with the default 5-minute challenge TTL
    pub fn new() -> Self {
        Self::with_ttl(crate::domain::entities::otp_challenge::DEFAULT_TTL_MINUTES)
    }

    /// Create a store with a custom challenge TTL in minutes
    pub fn with_ttl(ttl_minutes: i64) -> Self {
        Self {
            challenges: Mutex::new(HashMap::new()),
            ttl_minutes,
        }
    }

    fn key(mobile: &str, role: Role) -> ChallengeKey {
        (mobile.to_string(), role)
    }
}

impl Default for MemoryOtpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn issue(&self, mobile: &str, role: Role) -> DomainResult<OtpChallenge> {
        let challenge = OtpChallenge::with_ttl(mobile.to_string(), role, self.ttl_minutes);

        let mut challenges = self.challenges.lock().await;
        let replaced = challenges
            .insert(Self::key(mobile, role), challenge.clone())
            .is_some();

        debug!(
            mobile = %mask_mobile(mobile),
            role = %role,
            replaced = replaced,
            event = "challenge_issued",
            "Issued OTP challenge"
        );

        Ok(challenge)
    }

    async fn peek(&self, mobile: &str, role: Role) -> DomainResult<Option<OtpChallenge>> {
        let now = Utc::now();
        let challenges = self.challenges.lock().await;

        Ok(challenges
            .get(&Self::key(mobile, role))
            .filter(|c| !c.is_expired(now))
            .cloned())
    }

    async fn attempt_verify(
        &self,
        mobile: &str,
        role: Role,
        code: &str,
    ) -> DomainResult<AttemptReport> {
        let now = Utc::now();
        let mut challenges = self.challenges.lock().await;

        let challenge = challenges
            .get_mut(&Self::key(mobile, role))
            .ok_or(VerificationError::ChallengeNotFound)?;

        match challenge.register_attempt(code, now) {
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
            // A spent challenge is indistinguishable from an absent one.
            AttemptOutcome::Consumed => Err(VerificationError::ChallengeNotFound.into()),
        }
    }

    async fn clear(&self, mobile: &str, role: Role) -> DomainResult<()> {
        let mut challenges = self.challenges.lock().await;
        challenges.remove(&Self::key(mobile, role));
        Ok(())
    }

    async fn purge_expired(&self) -> DomainResult<usize> {
        let now = Utc::now();
        let mut challenges = self.challenges.lock().await;
        let before = challenges.len();
        challenges.retain(|_, c| !c.is_expired(now));
        Ok(before - challenges.len())
    }
}
