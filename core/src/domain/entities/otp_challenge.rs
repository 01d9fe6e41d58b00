//! OTP challenge entity for mobile-number verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Role;

/// Maximum number of verification attempts allowed per challenge
pub const MAX_ATTEMPTS: u32 = 5;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for challenges (5 minutes)
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// Lifecycle status of a challenge at a given instant
///
/// A challenge is `Live` until it is matched or its TTL passes.
/// `Consumed` takes precedence over `Expired`: a matched challenge stays
/// consumed even once its TTL has also passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeStatus {
    /// Unexpired, unconsumed, and below the attempt cap
    Live,
    /// TTL has passed without a successful match
    Expired,
    /// A verify call matched the code
    Consumed,
}

/// Outcome of a single verification attempt against a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Code matched; the challenge is now consumed
    Matched,
    /// Code did not match; the attempt was charged
    Mismatch { remaining_attempts: u32 },
    /// The attempt cap was already reached before this attempt
    Exhausted,
    /// The challenge expired before this attempt
    Expired,
    /// The challenge was already consumed by an earlier match
    Consumed,
}

/// Server-side record of one outstanding OTP expectation for a mobile+role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpChallenge {
    /// Unique identifier for the challenge
    pub id: Uuid,

    /// Mobile number the code was sent to (10 digits)
    pub mobile: String,

    /// Account class this challenge is scoped to
    pub role: Role,

    /// The 6-digit verification code
    pub code: String,

    /// Number of verification attempts charged against this challenge
    pub attempts: u32,

    /// Timestamp when the challenge was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the challenge expires
    pub expires_at: DateTime<Utc>,

    /// Whether a verify call has matched the code
    pub consumed: bool,
}

impl OtpChallenge {
    /// Creates a new challenge with a fresh random 6-digit code and the
    /// default 5-minute TTL
    pub fn new(mobile: String, role: Role) -> Self {
        Self::with_ttl(mobile, role, DEFAULT_TTL_MINUTES)
    }

    /// Creates a new challenge with a custom TTL in minutes
    pub fn with_ttl(mobile: String, role: Role, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            mobile,
            role,
            code: Self::generate_code(),
            attempts: 0,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
            consumed: false,
        }
    }

    /// Generates a 6-digit code uniformly distributed over 000000-999999
    ///
    /// Uses the OS CSPRNG with rejection sampling so every code is equally
    /// likely.
    fn generate_code() -> String {
        let mut rng = OsRng;
        // Reject values that would bias the modulo fold.
        let limit = u32::MAX - (u32::MAX % 1_000_000);
        let code = loop {
            let mut bytes = [0u8; 4];
            rng.fill_bytes(&mut bytes);
            let num = u32::from_le_bytes(bytes);
            if num < limit {
                break num % 1_000_000;
            }
        };
        format!("{:06}", code)
    }

    /// Checks if the challenge has expired at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// The lifecycle status of this challenge at the given instant
    pub fn status(&self, now: DateTime<Utc>) -> ChallengeStatus {
        if self.consumed {
            ChallengeStatus::Consumed
        } else if self.is_expired(now) {
            ChallengeStatus::Expired
        } else {
            ChallengeStatus::Live
        }
    }

    /// Whether the challenge can still accept verification attempts
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == ChallengeStatus::Live && self.attempts < MAX_ATTEMPTS
    }

    /// Number of verification attempts remaining (0 if exhausted)
    pub fn remaining_attempts(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.attempts)
    }

    /// Charges one verification attempt against this challenge and
    /// compares the submitted code.
    ///
    /// Fails closed on consumed, expired, or exhausted challenges without
    /// charging an attempt. Otherwise the attempt counter is incremented
    /// *before* the comparison, so the cap cannot be bypassed by
    /// rapid-fire guessing; on a match the challenge becomes consumed.
    /// The comparison is constant-time.
    pub fn register_attempt(&mut self, input_code: &str, now: DateTime<Utc>) -> AttemptOutcome {
        if self.consumed {
            return AttemptOutcome::Consumed;
        }
        if self.is_expired(now) {
            return AttemptOutcome::Expired;
        }
        if self.attempts >= MAX_ATTEMPTS {
            return AttemptOutcome::Exhausted;
        }

        // Charge the attempt before comparing.
        self.attempts += 1;

        if self.code.len() == input_code.len()
            && constant_time_eq(self.code.as_bytes(), input_code.as_bytes())
        {
            self.consumed = true;
            AttemptOutcome::Matched
        } else {
            AttemptOutcome::Mismatch {
                remaining_attempts: self.remaining_attempts(),
            }
        }
    }

    /// Seconds until expiration at the given instant (0 if already expired)
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}
