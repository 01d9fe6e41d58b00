use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use rl_api::app::create_app;
use rl_api::config::ApiConfig;
use rl_api::routes::AppState;
use rl_core::repositories::account::MemoryAccountRepository;
use rl_core::repositories::otp::MemoryOtpStore;
use rl_core::repositories::rate_limit::MemoryRateLimiter;
use rl_core::services::identity::IdentityService;
use rl_core::services::verification::{
    ChallengeSweeper, SweeperConfig, VerificationConfig, VerificationService,
};
use rl_infra::notify::LogNotifier;
use rl_infra::services::OpaqueSessionIssuer;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging; the fmt subscriber also collects `log` records
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env();
    info!(
        "Starting RideLink API server ({} environment)",
        config.environment
    );

    // Stores and collaborators. The in-memory stores serve a single-node
    // deployment; swap in the rl_infra Redis implementations to share
    // state across nodes.
    let otp_store = Arc::new(MemoryOtpStore::with_ttl(config.otp.ttl_minutes));
    let rate_limiter = Arc::new(MemoryRateLimiter::new());
    let accounts = Arc::new(MemoryAccountRepository::new());
    let notifier = Arc::new(LogNotifier::new());
    let sessions = Arc::new(OpaqueSessionIssuer::new());

    let verification_service = Arc::new(VerificationService::new(
        Arc::clone(&otp_store),
        rate_limiter,
        notifier,
        VerificationConfig::from_shared(&config.otp, &config.rate_limits),
    ));
    let identity_service = Arc::new(IdentityService::new(
        Arc::clone(&otp_store),
        accounts,
        sessions,
    ));

    // Background sweep for expired challenges
    ChallengeSweeper::new(Arc::clone(&otp_store), SweeperConfig::default()).spawn();

    let app_state = web::Data::new(AppState {
        verification_service,
        identity_service,
    });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let workers = config.server.workers;
    let mut server = HttpServer::new(move || create_app(app_state.clone()));
    if workers > 0 {
        server = server.workers(workers);
    }

    server.bind(&bind_address)?.run().await
}
