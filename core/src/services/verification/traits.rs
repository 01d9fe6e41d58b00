//! Collaborator traits for the verification service

use async_trait::async_trait;

/// Trait for the code delivery collaborator
///
/// In production this fronts an SMS gateway; the default deployment
/// degrades to a log line.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a verification code to a mobile number, returning a
    /// provider message id
    async fn deliver_code(&self, mobile: &str, code: &str) -> Result<String, String>;
}
