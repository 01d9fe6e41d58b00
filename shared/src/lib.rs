//! # RideLink Shared
//!
//! Cross-cutting configuration and utilities shared by the RideLink backend
//! crates: environment detection, server/OTP/rate-limit configuration, and
//! mobile number helpers.

pub mod config;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::environment::Environment;
pub use config::otp::OtpConfig;
pub use config::rate_limit::RateLimitConfig;
pub use config::server::ServerConfig;
