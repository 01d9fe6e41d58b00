//! Wire DTOs for the OTP and account-resolution endpoints
//!
//! Field names are camelCase on the wire (`userType`, `expiresAt`,
//! `remainingAttempts`); optional fields are omitted, not null.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    /// 10-digit mobile number
    #[validate(length(equal = 10))]
    pub mobile: String,

    /// "customer" or "driver"
    pub user_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    /// 10-digit mobile number
    #[validate(length(equal = 10))]
    pub mobile: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub otp: String,

    /// "customer" or "driver"
    pub user_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,

    /// When the issued challenge expires
    pub expires_at: DateTime<Utc>,

    /// The raw code, present only outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// 10-digit mobile number, previously OTP-verified
    #[validate(length(equal = 10))]
    pub mobile: String,

    /// "customer" or "driver"
    pub user_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// 10-digit mobile number, previously OTP-verified
    #[validate(length(equal = 10))]
    pub mobile: String,

    /// "customer" or "driver"
    pub user_type: String,

    /// Display name for the new account
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,

    /// Opaque session token
    pub token: String,

    /// The resolved account id
    pub account_id: String,

    /// Whether this call created the account
    pub registered: bool,
}

/// Error body shared by all endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable reason
    pub error: String,

    /// Active lock expiry, when a lock refused the action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<DateTime<Utc>>,

    /// Attempts left on the current challenge, after a mismatch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
}

impl ErrorBody {
    /// A bare error message body
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            locked_until: None,
            remaining_attempts: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_names_are_camel_case() {
        let request: SendOtpRequest =
            serde_json::from_str(r#"{"mobile":"9876543210","userType":"customer"}"#).unwrap();
        assert_eq!(request.mobile, "9876543210");
        assert_eq!(request.user_type, "customer");
    }

    #[test]
    fn test_send_response_omits_absent_otp() {
        let response = SendOtpResponse {
            success: true,
            expires_at: Utc::now(),
            otp: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("expiresAt"));
        assert!(!json.contains("\"otp\""));
    }

    #[test]
    fn test_error_body_omits_absent_fields() {
        let body = ErrorBody::new("Invalid verification code");
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("lockedUntil"));
        assert!(!json.contains("remainingAttempts"));

        let body = ErrorBody {
            error: "Invalid verification code".to_string(),
            locked_until: None,
            remaining_attempts: Some(4),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"remainingAttempts\":4"));
    }
}
