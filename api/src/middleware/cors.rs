//! CORS configuration

use actix_cors::Cors;
use actix_web::http::header;

/// Build the CORS middleware
///
/// Allowed origins come from `CORS_ALLOWED_ORIGINS` (comma-separated);
/// with none set, any origin is accepted, which is the development
/// posture.
pub fn create_cors() -> Cors {
    let allowed = std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if allowed.is_empty() {
        cors = cors.allow_any_origin();
    } else {
        for origin in allowed.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
