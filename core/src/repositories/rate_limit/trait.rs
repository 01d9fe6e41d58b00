//! Rate limiter trait bounding OTP sends and verification attempts per
//! identifier.
//!
//! This bound is independent of the challenge's own attempt cap: it
//! defends against an attacker requesting fresh challenges to reset the
//! per-challenge counter. `check`, `record`, and `lock` are deliberately
//! separate operations so callers can apply different policies per action
//! class: sends are windowed but never hard-lock, while exhausted
//! verification attempts escalate to an explicit lock. That policy belongs
//! to the verification service, not to the limiter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::rate_limit_record::LimitKind;
use crate::errors::DomainResult;

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    /// Whether the action may proceed
    pub allowed: bool,
    /// The active lock's expiry, if a lock refused the action
    pub locked_until: Option<DateTime<Utc>>,
    /// Seconds until the refusal would clear, when known
    pub retry_after_seconds: Option<i64>,
}

impl RateDecision {
    /// A decision allowing the action
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            locked_until: None,
            retry_after_seconds: None,
        }
    }
}

/// Tracks attempts per (identifier, kind) over a sliding window and
/// issues temporary lockouts
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Checks whether an action is currently allowed.
    ///
    /// An active lock refuses regardless of the attempt count. Otherwise
    /// the action is refused when the window already holds `max_attempts`.
    /// A stale window (last attempt older than the window) counts as
    /// reset. `check` never sets a lock by itself.
    async fn check(
        &self,
        identifier: &str,
        kind: LimitKind,
        max_attempts: u32,
        window_minutes: i64,
    ) -> DomainResult<RateDecision>;

    /// Records one attempt, creating the record on first use.
    async fn record(&self, identifier: &str, kind: LimitKind) -> DomainResult<()>;

    /// Sets a lock refusing all actions for the identifier+kind until
    /// `minutes` from now. Locks are monotonic: a shorter lock never
    /// shortens an existing one, and window resets do not clear them.
    async fn lock(&self, identifier: &str, kind: LimitKind, minutes: i64) -> DomainResult<()>;
}
