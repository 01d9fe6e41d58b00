//! Infrastructure service implementations.

pub mod rate_limiter;
pub mod session;

pub use rate_limiter::RedisRateLimiter;
pub use session::OpaqueSessionIssuer;
