//! Configuration modules for the RideLink backend.

pub mod environment;
pub mod otp;
pub mod rate_limit;
pub mod server;

pub use environment::Environment;
pub use otp::OtpConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
