//! Domain entities representing core business objects.

pub mod account;
pub mod otp_challenge;
pub mod rate_limit_record;

// Re-export commonly used types
pub use account::{Account, Role};
pub use otp_challenge::{
    AttemptOutcome, ChallengeStatus, OtpChallenge, CODE_LENGTH, DEFAULT_TTL_MINUTES, MAX_ATTEMPTS,
};
pub use rate_limit_record::{LimitKind, RateLimitRecord};
