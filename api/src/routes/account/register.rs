//! Handler for POST /auth/register

use actix_web::{web, HttpResponse};
use log::info;

use rl_core::repositories::account::AccountRepository;
use rl_core::repositories::otp::OtpStore;
use rl_core::repositories::rate_limit::RateLimiter;
use rl_core::services::identity::SessionIssuer;
use rl_core::services::verification::Notifier;
use rl_shared::utils::phone::mask_mobile;

use crate::dto::otp::{AuthResponse, RegisterRequest};
use crate::handlers::error::to_http_response;
use crate::routes::{parse_role, validate_request, AppState};

/// Handler for POST /auth/register
///
/// Creates an account for an OTP-verified mobile and issues a session.
/// Only reachable after a successful verify in this flow; the spent
/// challenge cannot authorize a second account action.
///
/// # Responses
///
/// * `200` - `{ "success": true, "token": "...", "accountId": "...",
///   "registered": true }`
/// * `400` - the mobile is not OTP-verified in this flow
/// * `409` - an account already exists for this mobile and role
pub async fn register<O, R, N, A, S>(
    state: web::Data<AppState<O, R, N, A, S>>,
    request: web::Json<RegisterRequest>,
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
        "Processing registration for mobile {} as {}",
        mask_mobile(&request.mobile),
        role
    );

    match state
        .identity_service
        .register(&request.mobile, role, &request.full_name)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(AuthResponse {
            success: true,
            token: outcome.session.token,
            account_id: outcome.account.id.to_string(),
            registered: outcome.registered,
        }),
        Err(error) => to_http_response(&error),
    }
}
