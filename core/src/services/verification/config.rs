//! Configuration for the verification service

use rl_shared::config::otp::OtpConfig;
use rl_shared::config::rate_limit::RateLimitConfig;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Max OTP send requests per identifier per window
    pub send_max_per_window: u32,
    /// Send window duration in minutes
    pub send_window_minutes: i64,
    /// Max verify requests per identifier per window
    pub verify_max_per_window: u32,
    /// Verify window duration in minutes
    pub verify_window_minutes: i64,
    /// Lock duration in minutes once a challenge's attempts are exhausted
    pub verify_lock_minutes: i64,
    /// Minimum seconds between resend requests (surfaced to clients)
    pub resend_cooldown_seconds: i64,
    /// Whether the raw code is echoed back in the send outcome.
    /// A boundary flag for development builds, never a security boundary.
    pub expose_otp_in_response: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self::from_shared(&OtpConfig::default(), &RateLimitConfig::default())
    }
}

impl VerificationConfig {
    /// Assemble the service configuration from the shared config structs
    pub fn from_shared(otp: &OtpConfig, limits: &RateLimitConfig) -> Self {
        Self {
            send_max_per_window: limits.send.max_per_window,
            send_window_minutes: limits.send.window_minutes,
            verify_max_per_window: limits.verify.max_per_window,
            verify_window_minutes: limits.verify.window_minutes,
            verify_lock_minutes: limits.verify.lock_minutes,
            resend_cooldown_seconds: otp.resend_cooldown_seconds,
            expose_otp_in_response: otp.expose_otp_in_response,
        }
    }
}
