//! Route handlers and shared application state.

pub mod account;
pub mod otp;

use std::sync::Arc;

use actix_web::HttpResponse;
use validator::Validate;

use rl_core::domain::entities::account::Role;
use rl_core::repositories::account::AccountRepository;
use rl_core::repositories::otp::OtpStore;
use rl_core::repositories::rate_limit::RateLimiter;
use rl_core::services::identity::{IdentityService, SessionIssuer};
use rl_core::services::verification::{Notifier, VerificationService};

use crate::dto::otp::ErrorBody;

/// Application state holding the shared services
pub struct AppState<O, R, N, A, S>
where
    O: OtpStore,
    R: RateLimiter,
    N: Notifier,
    A: AccountRepository,
    S: SessionIssuer,
{
    pub verification_service: Arc<VerificationService<O, R, N>>,
    pub identity_service: Arc<IdentityService<O, A, S>>,
}

/// Validate a DTO, collapsing field errors into the wire error body
pub(crate) fn validate_request<T: Validate>(request: &T) -> Result<(), HttpResponse> {
    if let Err(errors) = request.validate() {
        let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();
        return Err(HttpResponse::BadRequest().json(ErrorBody::new(format!(
            "Invalid request: {}",
            fields.join(", ")
        ))));
    }
    Ok(())
}

/// Parse the `userType` field, rejecting anything but the two roles
pub(crate) fn parse_role(user_type: &str) -> Result<Role, HttpResponse> {
    user_type.parse::<Role>().map_err(|_| {
        HttpResponse::BadRequest().json(ErrorBody::new(
            "userType must be 'customer' or 'driver'",
        ))
    })
}
