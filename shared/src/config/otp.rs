//! OTP challenge configuration

use serde::{Deserialize, Serialize};
use std::env;

use super::environment::Environment;

/// Configuration for OTP challenge issuance and verification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Number of minutes before a challenge expires
    pub ttl_minutes: i64,

    /// Minimum seconds between resend requests
    pub resend_cooldown_seconds: i64,

    /// Whether the raw code is echoed back in the send response.
    /// Never true in production; the flag lives here so the core
    /// service stays free of environment checks.
    pub expose_otp_in_response: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 5,
            resend_cooldown_seconds: 60,
            expose_otp_in_response: false,
        }
    }
}

impl OtpConfig {
    /// Configuration appropriate for the given environment
    pub fn for_environment(env: Environment) -> Self {
        Self {
            expose_otp_in_response: !env.is_production(),
            ..Default::default()
        }
    }

    /// Load OTP configuration from environment variables
    ///
    /// `EXPOSE_OTP_IN_RESPONSE` may force the echo flag off in
    /// non-production environments; it is ignored in production.
    pub fn from_env(environment: Environment) -> Self {
        let mut config = Self::for_environment(environment);

        if let Ok(value) = env::var("EXPOSE_OTP_IN_RESPONSE") {
            let requested = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes");
            config.expose_otp_in_response = requested && !environment.is_production();
        }

        config
    }
}
