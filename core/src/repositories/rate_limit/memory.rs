//! In-memory rate limiter used by tests and the development server.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::entities::rate_limit_record::{LimitKind, RateLimitRecord};
use crate::errors::DomainResult;

use super::trait_::{RateDecision, RateLimiter};

type RecordKey = (String, LimitKind);

/// In-memory implementation of [`RateLimiter`]
///
/// Stale windows are reset eagerly: the moment a check observes a record
/// whose last attempt predates the window, the counter is zeroed, so a
/// stale nonzero count can never refuse a request.
pub struct MemoryRateLimiter {
    records: Mutex<HashMap<RecordKey, RateLimitRecord>>,
}

impl MemoryRateLimiter {
    /// Create an empty limiter
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    fn key(identifier: &str, kind: LimitKind) -> RecordKey {
        (identifier.to_string(), kind)
    }
}

impl Default for MemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn check(
        &self,
        identifier: &str,
        kind: LimitKind,
        max_attempts: u32,
        window_minutes: i64,
    ) -> DomainResult<RateDecision> {
        let now = Utc::now();
        let mut records = self.records.lock().await;

        let record = match records.get_mut(&Self::key(identifier, kind)) {
            Some(record) => record,
            None => return Ok(RateDecision::allowed()),
        };

        if record.is_locked(now) {
            let locked_until = record.locked_until.unwrap();
            debug!(
                identifier = identifier,
                kind = %kind,
                locked_until = %locked_until,
                event = "rate_limit_locked",
                "Action refused by active lock"
            );
            return Ok(RateDecision {
                allowed: false,
                locked_until: Some(locked_until),
                retry_after_seconds: Some((locked_until - now).num_seconds().max(1)),
            });
        }

        let window = Duration::minutes(window_minutes);
        if record.window_expired(now, window) {
            record.reset_window(now);
            return Ok(RateDecision::allowed());
        }

        if record.attempts >= max_attempts {
            let retry_after = (record.last_attempt + window - now).num_seconds().max(1);
            debug!(
                identifier = identifier,
                kind = %kind,
                attempts = record.attempts,
                event = "rate_limit_exceeded",
                "Action refused by window limit"
            );
            return Ok(RateDecision {
                allowed: false,
                locked_until: None,
                retry_after_seconds: Some(retry_after),
            });
        }

        Ok(RateDecision::allowed())
    }

    async fn record(&self, identifier: &str, kind: LimitKind) -> DomainResult<()> {
        let now = Utc::now();
        let mut records = self.records.lock().await;

        records
            .entry(Self::key(identifier, kind))
            .or_insert_with(|| RateLimitRecord::new(identifier.to_string(), kind, now))
            .register_attempt(now);

        Ok(())
    }

    async fn lock(&self, identifier: &str, kind: LimitKind, minutes: i64) -> DomainResult<()> {
        let now = Utc::now();
        let mut records = self.records.lock().await;

        records
            .entry(Self::key(identifier, kind))
            .or_insert_with(|| RateLimitRecord::new(identifier.to_string(), kind, now))
            .lock_until(now + Duration::minutes(minutes));

        debug!(
            identifier = identifier,
            kind = %kind,
            minutes = minutes,
            event = "rate_limit_lock_set",
            "Lock set"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "9876543210:customer";

    #[tokio::test]
    async fn test_unknown_identifier_is_allowed() {
        let limiter = MemoryRateLimiter::new();
        let decision = limiter.check(ID, LimitKind::OtpSend, 5, 10).await.unwrap();
        assert!(decision.allowed);
    }

    #[tokio::test]
    async fn test_window_refuses_at_limit() {
        let limiter = MemoryRateLimiter::new();

        for _ in 0..5 {
            let decision = limiter.check(ID, LimitKind::OtpSend, 5, 10).await.unwrap();
            assert!(decision.allowed);
            limiter.record(ID, LimitKind::OtpSend).await.unwrap();
        }

        let decision = limiter.check(ID, LimitKind::OtpSend, 5, 10).await.unwrap();
        assert!(!decision.allowed);
        assert!(decision.locked_until.is_none());
        assert!(decision.retry_after_seconds.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_kinds_are_independent() {
        let limiter = MemoryRateLimiter::new();

        for _ in 0..5 {
            limiter.record(ID, LimitKind::OtpSend).await.unwrap();
        }

        let send = limiter.check(ID, LimitKind::OtpSend, 5, 10).await.unwrap();
        assert!(!send.allowed);
        let verify = limiter.check(ID, LimitKind::OtpVerify, 5, 10).await.unwrap();
        assert!(verify.allowed);
    }

    #[tokio::test]
    async fn test_lock_refuses_even_with_empty_window() {
        let limiter = MemoryRateLimiter::new();

        limiter.lock(ID, LimitKind::OtpVerify, 15).await.unwrap();

        let decision = limiter.check(ID, LimitKind::OtpVerify, 5, 10).await.unwrap();
        assert!(!decision.allowed);
        assert!(decision.locked_until.is_some());
        assert!(decision.retry_after_seconds.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_lock_survives_further_records() {
        let limiter = MemoryRateLimiter::new();
        limiter.lock(ID, LimitKind::OtpVerify, 15).await.unwrap();

        // Recording does not clear the lock.
        limiter.record(ID, LimitKind::OtpVerify).await.unwrap();

        let decision = limiter.check(ID, LimitKind::OtpVerify, 100, 10).await.unwrap();
        assert!(!decision.allowed);
        assert!(decision.locked_until.is_some());
    }

    #[tokio::test]
    async fn test_check_does_not_consume_budget() {
        let limiter = MemoryRateLimiter::new();

        // Many checks without records stay allowed.
        for _ in 0..20 {
            let decision = limiter.check(ID, LimitKind::OtpSend, 5, 10).await.unwrap();
            assert!(decision.allowed);
        }
    }
}
