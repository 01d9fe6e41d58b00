//! Verification service module for mobile-number OTP authentication
//!
//! This module composes the OTP store and rate limiter into the
//! externally callable send/verify protocol:
//! - code issuance and delivery through the notifier collaborator
//! - verification with per-challenge attempt tracking
//! - per-identifier windowing with lock escalation
//! - the periodic expired-challenge sweep

mod config;
mod service;
mod sweeper;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use service::VerificationService;
pub use sweeper::{ChallengeSweeper, SweeperConfig};
pub use traits::Notifier;
pub use types::SendOtpOutcome;
