//! # RideLink Infrastructure
//!
//! Concrete implementations of the core collaborator traits:
//! - **Cache**: Redis client plus the Redis-backed OTP store
//! - **Services**: Redis-backed rate limiter and the opaque session issuer
//! - **Notify**: the log-line notifier standing in for an SMS gateway
//!
//! The in-memory implementations used by tests and the development server
//! live in `rl_core`; everything here talks to real processes.

pub mod cache;
pub mod notify;
pub mod services;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
