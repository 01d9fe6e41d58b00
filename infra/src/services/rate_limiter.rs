//! Redis-based rate limiter implementation
//!
//! Sliding windows are sorted sets of attempt timestamps under
//! `rate:{kind}:{id-hash}`; locks are plain keys with a TTL under
//! `rate:lock:{kind}:{id-hash}`. Identifiers contain mobile numbers, so
//! they are hashed before keying.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use redis::AsyncCommands;

use rl_core::domain::entities::rate_limit_record::LimitKind;
use rl_core::errors::{DomainError, DomainResult};
use rl_core::repositories::rate_limit::{RateDecision, RateLimiter};

use crate::cache::redis_client::RedisClient;

/// Redis-backed implementation of [`RateLimiter`]
pub struct RedisRateLimiter {
    client: RedisClient,
}

impl RedisRateLimiter {
    /// Create a new Redis-based rate limiter
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn window_key(identifier: &str, kind: LimitKind) -> String {
        format!("rate:{}:{}", kind.as_str(), hash_identifier(identifier))
    }

    fn lock_key(identifier: &str, kind: LimitKind) -> String {
        format!("rate:lock:{}:{}", kind.as_str(), hash_identifier(identifier))
    }
}

fn internal(e: impl std::fmt::Display) -> DomainError {
    DomainError::Internal {
        message: e.to_string(),
    }
}

/// Hash an identifier before it becomes a Redis key (mobile numbers must
/// not appear in key listings)
fn hash_identifier(identifier: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(
        &self,
        identifier: &str,
        kind: LimitKind,
        max_attempts: u32,
        window_minutes: i64,
    ) -> DomainResult<RateDecision> {
        let mut conn = self.client.connection();
        let now = Utc::now();

        // An active lock refuses regardless of the window.
        let lock_key = Self::lock_key(identifier, kind);
        let lock_ttl: i64 = conn.ttl(&lock_key).await.map_err(internal)?;
        if lock_ttl > 0 {
            return Ok(RateDecision {
                allowed: false,
                locked_until: Some(now + Duration::seconds(lock_ttl)),
                retry_after_seconds: Some(lock_ttl),
            });
        }

        let window_key = Self::window_key(identifier, kind);
        let window_ms = window_minutes * 60 * 1000;
        let window_start = now.timestamp_millis() - window_ms;

        // Eager reset: entries that slid out of the window are removed
        // before counting.
        let _: i64 = redis::cmd("ZREMRANGEBYSCORE")
            .arg(&window_key)
            .arg("-inf")
            .arg(window_start)
            .query_async(&mut conn)
            .await
            .map_err(internal)?;

        let count: u32 = conn
            .zcount(&window_key, window_start, "+inf")
            .await
            .map_err(internal)?;

        if count >= max_attempts {
            // The oldest surviving entry determines when a slot frees up.
            let oldest: Vec<(String, i64)> = conn
                .zrangebyscore_limit_withscores(&window_key, window_start, "+inf", 0, 1)
                .await
                .map_err(internal)?;

            let retry_after = oldest
                .first()
                .map(|(_, ts)| ((ts + window_ms - now.timestamp_millis()) / 1000).max(1))
                .unwrap_or(window_minutes * 60);

            return Ok(RateDecision {
                allowed: false,
                locked_until: None,
                retry_after_seconds: Some(retry_after),
            });
        }

        Ok(RateDecision::allowed())
    }

    async fn record(&self, identifier: &str, kind: LimitKind) -> DomainResult<()> {
        let mut conn = self.client.connection();
        let now = Utc::now().timestamp_millis();
        let window_key = Self::window_key(identifier, kind);

        let _: () = conn
            .zadd(&window_key, now.to_string(), now)
            .await
            .map_err(internal)?;

        // Bound the key's lifetime; generous enough for any window in use.
        let _: () = conn.expire(&window_key, 24 * 3600).await.map_err(internal)?;

        Ok(())
    }

    async fn lock(&self, identifier: &str, kind: LimitKind, minutes: i64) -> DomainResult<()> {
        let mut conn = self.client.connection();
        let lock_key = Self::lock_key(identifier, kind);
        let seconds = (minutes * 60).max(1);

        // Monotonic: never shorten an existing lock.
        let existing: i64 = conn.ttl(&lock_key).await.map_err(internal)?;
        if existing >= seconds {
            return Ok(());
        }

        let _: () = conn
            .set_ex(&lock_key, "locked", seconds as u64)
            .await
            .map_err(internal)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_hashed_out_of_keys() {
        let key = RedisRateLimiter::window_key("9876543210:customer", LimitKind::OtpSend);
        assert!(key.starts_with("rate:otp_send:"));
        assert!(!key.contains("9876543210"));
    }

    #[test]
    fn test_lock_and_window_keys_differ() {
        let id = "9876543210:driver";
        assert_ne!(
            RedisRateLimiter::window_key(id, LimitKind::OtpVerify),
            RedisRateLimiter::lock_key(id, LimitKind::OtpVerify)
        );
    }
}
