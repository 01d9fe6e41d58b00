//! Store interfaces and their in-memory implementations.

pub mod account;
pub mod otp;
pub mod rate_limit;

pub use account::{AccountRepository, MemoryAccountRepository};
pub use otp::{AttemptReport, MemoryOtpStore, OtpStore};
pub use rate_limit::{MemoryRateLimiter, RateDecision, RateLimiter};
