//! Handler for POST /otp/send

use actix_web::{web, HttpResponse};
use log::info;

use rl_core::repositories::account::AccountRepository;
use rl_core::repositories::otp::OtpStore;
use rl_core::repositories::rate_limit::RateLimiter;
use rl_core::services::identity::SessionIssuer;
use rl_core::services::verification::Notifier;
use rl_shared::utils::phone::mask_mobile;

use crate::dto::otp::{SendOtpRequest, SendOtpResponse};
use crate::handlers::error::to_http_response;
use crate::routes::{parse_role, validate_request, AppState};

/// Handler for POST /otp/send
///
/// Issues and delivers a fresh verification code for the mobile+role.
///
/// # Request Body
///
/// ```json
/// { "mobile": "9876543210", "userType": "customer" }
/// ```
///
/// # Responses
///
/// * `200` - `{ "success": true, "expiresAt": "...", "otp": "123456"? }`
///   (the `otp` field only outside production)
/// * `400` - invalid mobile or user type
/// * `429` - send window exhausted or identifier locked, with
///   `lockedUntil` when a lock is active
/// * `503` - code delivery failed
pub async fn send_otp<O, R, N, A, S>(
    state: web::Data<AppState<O, R, N, A, S>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse
where
    O: OtpStore + 'static,
    R: RateLimiter + 'static,
    N: Notifier + 'static,
    A: AccountRepository + 'static,
    S: SessionIssuer + 'static,
{
    if let Err(response) = validate_request(&request.0) {
        return response;
    }

    let role = match parse_role(&request.user_type) {
        Ok(role) => role,
        Err(response) => return response,
    };

    info!(
        "Processing OTP send for mobile {} as {}",
        mask_mobile(&request.mobile),
        role
    );

    match state
        .verification_service
        .send_otp(&request.mobile, role)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(SendOtpResponse {
            success: true,
            expires_at: outcome.expires_at,
            otp: outcome.otp,
        }),
        Err(error) => to_http_response(&error),
    }
}
