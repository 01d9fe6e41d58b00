//! Sliding-window rate-limit record for OTP actions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The class of limited action a record tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    /// Requests to send a fresh OTP
    OtpSend,
    /// Attempts to verify a submitted code
    OtpVerify,
}

impl LimitKind {
    /// The storage key segment for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitKind::OtpSend => "otp_send",
            LimitKind::OtpVerify => "otp_verify",
        }
    }
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attempt counter for one (identifier, kind) over a sliding window,
/// with an optional escalated lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    /// Scope key, e.g. "mobile:role"
    pub identifier: String,

    /// The limited action class
    pub kind: LimitKind,

    /// Attempts within the current window
    pub attempts: u32,

    /// When the current window opened
    pub window_start: DateTime<Utc>,

    /// Timestamp of the most recent attempt
    pub last_attempt: DateTime<Utc>,

    /// While set and in the future, all actions are refused regardless of
    /// the attempt count
    pub locked_until: Option<DateTime<Utc>>,
}

impl RateLimitRecord {
    /// Creates a record for a first attempt at the given instant
    pub fn new(identifier: String, kind: LimitKind, now: DateTime<Utc>) -> Self {
        Self {
            identifier,
            kind,
            attempts: 0,
            window_start: now,
            last_attempt: now,
            locked_until: None,
        }
    }

    /// Whether an escalated lock is active at the given instant
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if until > now)
    }

    /// Whether the last attempt predates the window, meaning the counter
    /// no longer reflects recent activity
    pub fn window_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.last_attempt < now - window
    }

    /// Opens a fresh window with a zeroed counter. The lock, if any, is
    /// untouched: locks are monotonic and outlive window resets.
    pub fn reset_window(&mut self, now: DateTime<Utc>) {
        self.attempts = 0;
        self.window_start = now;
    }

    /// Charges one attempt and refreshes the last-attempt timestamp
    pub fn register_attempt(&mut self, now: DateTime<Utc>) {
        self.attempts += 1;
        self.last_attempt = now;
    }

    /// Extends the lock to the given instant. A shorter lock never
    /// replaces a longer one.
    pub fn lock_until(&mut self, until: DateTime<Utc>) {
        self.locked_until = Some(match self.locked_until {
            Some(existing) if existing > until => existing,
            _ => until,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(now: DateTime<Utc>) -> RateLimitRecord {
        RateLimitRecord::new("9876543210:customer".to_string(), LimitKind::OtpSend, now)
    }

    #[test]
    fn test_new_record() {
        let now = Utc::now();
        let r = record(now);

        assert_eq!(r.attempts, 0);
        assert_eq!(r.window_start, now);
        assert!(!r.is_locked(now));
    }

    #[test]
    fn test_register_attempt() {
        let now = Utc::now();
        let mut r = record(now);

        let later = now + Duration::seconds(5);
        r.register_attempt(later);
        assert_eq!(r.attempts, 1);
        assert_eq!(r.last_attempt, later);
    }

    #[test]
    fn test_window_expiry() {
        let now = Utc::now();
        let mut r = record(now);
        r.register_attempt(now);

        let window = Duration::minutes(10);
        assert!(!r.window_expired(now + Duration::minutes(9), window));
        assert!(r.window_expired(now + Duration::minutes(11), window));

        r.reset_window(now + Duration::minutes(11));
        assert_eq!(r.attempts, 0);
    }

    #[test]
    fn test_lock_is_monotonic() {
        let now = Utc::now();
        let mut r = record(now);

        r.lock_until(now + Duration::minutes(15));
        assert!(r.is_locked(now));

        // A shorter lock does not shrink the existing one.
        r.lock_until(now + Duration::minutes(5));
        assert_eq!(r.locked_until, Some(now + Duration::minutes(15)));

        // A longer lock extends it.
        r.lock_until(now + Duration::minutes(30));
        assert_eq!(r.locked_until, Some(now + Duration::minutes(30)));
    }

    #[test]
    fn test_window_reset_preserves_lock() {
        let now = Utc::now();
        let mut r = record(now);
        r.register_attempt(now);
        r.lock_until(now + Duration::minutes(15));

        r.reset_window(now + Duration::minutes(11));
        assert_eq!(r.attempts, 0);
        assert!(r.is_locked(now + Duration::minutes(11)));
    }

    #[test]
    fn test_lock_expires() {
        let now = Utc::now();
        let mut r = record(now);
        r.lock_until(now + Duration::minutes(15));

        assert!(r.is_locked(now + Duration::minutes(14)));
        assert!(!r.is_locked(now + Duration::minutes(16)));
    }

    #[test]
    fn test_limit_kind_names() {
        assert_eq!(LimitKind::OtpSend.as_str(), "otp_send");
        assert_eq!(LimitKind::OtpVerify.as_str(), "otp_verify");
    }
}
