//! Handler for POST /auth/login

use actix_web::{web, HttpResponse};
use log::info;

use rl_core::repositories::account::AccountRepository;
use rl_core::repositories::otp::OtpStore;
use rl_core::repositories::rate_limit::RateLimiter;
use rl_core::services::identity::SessionIssuer;
use rl_core::services::verification::Notifier;
use rl_shared::utils::phone::mask_mobile;

use crate::dto::otp::{AuthResponse, LoginRequest};
use crate::handlers::error::to_http_response;
use crate::routes::{parse_role, validate_request, AppState};

/// Handler for POST /auth/login
///
/// Logs in the account bound to an OTP-verified mobile. A `404` response
/// is the register branch signal: the number is verified but holds no
/// account yet, and the client should present the registration form.
///
/// # Responses
///
/// * `200` - `{ "success": true, "token": "...", "accountId": "...",
///   "registered": false }`
/// * `400` - the mobile is not OTP-verified in this flow
/// * `404` - verified, but no account exists
pub async fn login<O, R, N, A, S>(
    state: web::Data<AppState<O, R, N, A, S>>,
    request: web::Json<LoginRequest>,
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
        "Processing login for mobile {} as {}",
        mask_mobile(&request.mobile),
        role
    );

    match state.identity_service.login(&request.mobile, role).await {
        Ok(outcome) => HttpResponse::Ok().json(AuthResponse {
            success: true,
            token: outcome.session.token,
            account_id: outcome.account.id.to_string(),
            registered: outcome.registered,
        }),
        Err(error) => to_http_response(&error),
    }
}
