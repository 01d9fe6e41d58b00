//! Handler for POST /otp/verify

use actix_web::{web, HttpResponse};
use log::info;

use rl_core::repositories::account::AccountRepository;
use rl_core::repositories::otp::OtpStore;
use rl_core::repositories::rate_limit::RateLimiter;
use rl_core::services::identity::SessionIssuer;
use rl_core::services::verification::Notifier;
use rl_shared::utils::phone::mask_mobile;

use crate::dto::otp::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::error::to_http_response;
use crate::routes::{parse_role, validate_request, AppState};

/// Handler for POST /otp/verify
///
/// Verifies a submitted code against the live challenge. On success the
/// challenge is left consumed so the subsequent login or register call can
/// ride on it.
///
/// # Request Body
///
/// ```json
/// { "mobile": "9876543210", "otp": "123456", "userType": "customer" }
/// ```
///
/// # Responses
///
/// * `200` - `{ "success": true }`
/// * `400` - mismatch (with `remainingAttempts`), expired, exhausted, or
///   no challenge in progress
/// * `429` - verify window exhausted or identifier locked
pub async fn verify_otp<O, R, N, A, S>(
    state: web::Data<AppState<O, R, N, A, S>>,
    request: web::Json<VerifyOtpRequest>,
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
        "Processing OTP verify for mobile {} as {}",
        mask_mobile(&request.mobile),
        role
    );

    match state
        .verification_service
        .verify_otp(&request.mobile, role, &request.otp)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(VerifyOtpResponse { success: true }),
        Err(error) => to_http_response(&error),
    }
}
