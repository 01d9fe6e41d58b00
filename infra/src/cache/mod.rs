//! Cache layer: the Redis client and Redis-backed OTP store.

pub mod otp_store;
pub mod redis_client;

pub use otp_store::RedisOtpStore;
pub use redis_client::RedisClient;
