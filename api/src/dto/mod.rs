//! Request and response DTOs.

pub mod otp;
