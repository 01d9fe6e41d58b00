//! Request handling helpers.

pub mod error;

pub use error::to_http_response;
