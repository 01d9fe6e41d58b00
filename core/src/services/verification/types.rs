//! Types for verification service results

use chrono::{DateTime, Utc};

/// Result of sending a verification code
#[derive(Debug, Clone)]
pub struct SendOtpOutcome {
    /// When the issued challenge expires
    pub expires_at: DateTime<Utc>,
    /// When the client may request another code
    pub next_resend_at: DateTime<Utc>,
    /// The notifier's message id
    pub message_id: String,
    /// The raw code, present only when the development echo flag is on
    pub otp: Option<String>,
}
