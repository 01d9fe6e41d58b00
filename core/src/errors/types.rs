//! Error taxonomies for verification and account resolution
//!
//! Every failure path in the verification protocol carries a typed reason
//! rather than a bare boolean, so callers (and ultimately the client state
//! machine) can choose the correct recovery: re-show code entry, force a
//! resend, or display a lockout countdown.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures of the OTP send/verify protocol
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// No live challenge exists for the mobile+role (never issued,
    /// already spent, or replaced)
    #[error("No verification in progress. Please request a new code")]
    ChallengeNotFound,

    /// The challenge's TTL has passed
    #[error("Verification code has expired. Please request a new code")]
    ChallengeExpired,

    /// The submitted code did not match
    #[error("Invalid verification code")]
    CodeMismatch { remaining_attempts: u32 },

    /// The per-challenge attempt cap was reached
    #[error("Maximum verification attempts exceeded. Please request a new code")]
    AttemptsExhausted,

    /// The per-identifier window or an escalated lock refused the action
    #[error("Too many requests. Please try again later")]
    RateLimited {
        locked_until: Option<DateTime<Utc>>,
        retry_after_seconds: Option<i64>,
    },

    /// The notifier collaborator failed to deliver the code
    #[error("Could not deliver verification code. Please try again later")]
    NotifierFailure,
}

/// Failures of the account-resolution step
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// No account exists for the mobile+role. On the login path this is
    /// the branch signal that moves the flow to registration, not a
    /// terminal failure.
    #[error("No account found for this mobile number")]
    AccountNotFound,

    /// An account already exists for the mobile+role
    #[error("An account already exists for this mobile number")]
    AccountConflict,
}
