//! API configuration assembled from the environment

use rl_shared::config::environment::Environment;
use rl_shared::config::otp::OtpConfig;
use rl_shared::config::rate_limit::RateLimitConfig;
use rl_shared::config::server::ServerConfig;

/// All configuration the API binary needs at startup
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Which environment we are running in
    pub environment: Environment,
    /// Server binding
    pub server: ServerConfig,
    /// OTP challenge settings
    pub otp: OtpConfig,
    /// Rate-limit settings
    pub rate_limits: RateLimitConfig,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            otp: OtpConfig::from_env(environment),
            rate_limits: RateLimitConfig::production(),
        }
    }
}
