//! Utility functions shared across the RideLink backend.

pub mod phone;

pub use phone::{is_valid_mobile, mask_mobile};
