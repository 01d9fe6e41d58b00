//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// OTP send limits
    pub send: SendRateLimits,

    /// OTP verify limits
    pub verify: VerifyRateLimits,
}

/// Limits on OTP send requests per identifier
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendRateLimits {
    /// Max send requests per identifier per window
    pub max_per_window: u32,

    /// Window duration in minutes
    pub window_minutes: i64,
}

impl Default for SendRateLimits {
    fn default() -> Self {
        Self {
            max_per_window: 5,
            window_minutes: 10,
        }
    }
}

/// Limits on OTP verification attempts per identifier
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyRateLimits {
    /// Max verify requests per identifier per window.
    /// Wider than the per-challenge attempt cap: this bound exists to
    /// stop counter resets via freshly issued challenges, not to be the
    /// first line of defence.
    pub max_per_window: u32,

    /// Window duration in minutes
    pub window_minutes: i64,

    /// Lock duration in minutes once a challenge's attempts are exhausted
    pub lock_minutes: i64,
}

impl Default for VerifyRateLimits {
    fn default() -> Self {
        Self {
            max_per_window: 10,
            window_minutes: 10,
            lock_minutes: 15,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            send: SendRateLimits::default(),
            verify: VerifyRateLimits::default(),
        }
    }
}

impl RateLimitConfig {
    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            enabled: true,
            send: SendRateLimits {
                max_per_window: 20,
                ..Default::default()
            },
            verify: VerifyRateLimits {
                max_per_window: 50,
                ..Default::default()
            },
        }
    }

    /// Create a production configuration (default, stricter limits)
    pub fn production() -> Self {
        Self::default()
    }
}

fn default_enabled() -> bool {
    true
}
