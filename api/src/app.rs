//! Application factory
//!
//! Builds the Actix application from an [`AppState`]; used by both the
//! server binary and the integration tests.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use rl_core::repositories::account::AccountRepository;
use rl_core::repositories::otp::OtpStore;
use rl_core::repositories::rate_limit::RateLimiter;
use rl_core::services::identity::SessionIssuer;
use rl_core::services::verification::Notifier;

use crate::dto::otp::ErrorBody;
use crate::middleware::cors::create_cors;
use crate::routes::account::{login::login, register::register};
use crate::routes::otp::{send::send_otp, verify::verify_otp};
use crate::routes::AppState;

/// Create and configure the application with all dependencies
pub fn create_app<O, R, N, A, S>(
    app_state: web::Data<AppState<O, R, N, A, S>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    O: OtpStore + 'static,
    R: RateLimiter + 'static,
    N: Notifier + 'static,
    A: AccountRepository + 'static,
    S: SessionIssuer + 'static,
{
    let cors = create_cors();

    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // OTP protocol
        .service(
            web::scope("/otp")
                .route("/send", web::post().to(send_otp::<O, R, N, A, S>))
                .route("/verify", web::post().to(verify_otp::<O, R, N, A, S>)),
        )
        // Account resolution
        .service(
            web::scope("/auth")
                .route("/login", web::post().to(login::<O, R, N, A, S>))
                .route("/register", web::post().to(register::<O, R, N, A, S>)),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "ridelink-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new("The requested resource was not found"))
}
