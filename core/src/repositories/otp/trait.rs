//! OTP store trait: the single source of truth for challenge existence,
//! freshness, and consumption.
//!
//! Challenges are keyed by (mobile, role); at most one live challenge may
//! exist per key at any time. Only this interface may read or mutate
//! challenge records, so the at-most-one and attempt-cap invariants cannot
//! be bypassed by ad hoc access.

use async_trait::async_trait;

use crate::domain::entities::account::Role;
use crate::domain::entities::otp_challenge::OtpChallenge;
use crate::errors::DomainResult;

/// Result of a verification attempt that reached the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptReport {
    /// Whether the submitted code matched
    pub matched: bool,
    /// Attempts left on this challenge after the one just charged
    pub remaining_attempts: u32,
}

/// Store for OTP challenges keyed by (mobile, role)
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Issues a fresh challenge for the key, replacing any existing one.
    /// Issuance itself is never rate-limited here; that is the caller's
    /// policy.
    async fn issue(&self, mobile: &str, role: Role) -> DomainResult<OtpChallenge>;

    /// Returns the current non-expired challenge without mutating it.
    /// Consumed challenges are returned: this is the "has this number been
    /// verified" read used by the login/register gate.
    async fn peek(&self, mobile: &str, role: Role) -> DomainResult<Option<OtpChallenge>>;

    /// Charges a verification attempt and compares the code.
    ///
    /// Fails closed with `ChallengeNotFound` (absent or already consumed),
    /// `ChallengeExpired`, or `AttemptsExhausted`; otherwise returns an
    /// [`AttemptReport`]. The attempt-then-compare sequence is applied
    /// atomically per key.
    async fn attempt_verify(
        &self,
        mobile: &str,
        role: Role,
        code: &str,
    ) -> DomainResult<AttemptReport>;

    /// Deletes the challenge for the key. Called once a verified challenge
    /// has been spent by a completed registration or login.
    async fn clear(&self, mobile: &str, role: Role) -> DomainResult<()>;

    /// Deletes all expired challenges, returning how many were removed.
    /// Housekeeping only: expiry is re-checked on every read regardless.
    async fn purge_expired(&self) -> DomainResult<usize>;
}
