//! Domain error to HTTP response mapping
//!
//! One place decides status codes and the wire error body, so every
//! endpoint fails the same way. Each verification failure keeps its typed
//! payload (`lockedUntil`, `remainingAttempts`) on the way out; internal
//! errors are logged and collapsed to an opaque message.

use actix_web::HttpResponse;
use log::error;

use rl_core::errors::{AccountError, DomainError, VerificationError};

use crate::dto::otp::ErrorBody;

/// Map a domain error to its HTTP response
pub fn to_http_response(err: &DomainError) -> HttpResponse {
    match err {
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorBody::new(message.clone()))
        }

        DomainError::Verification(verification) => match verification {
            VerificationError::ChallengeNotFound
            | VerificationError::ChallengeExpired => {
                HttpResponse::BadRequest().json(ErrorBody::new(verification.to_string()))
            }

            VerificationError::CodeMismatch { remaining_attempts } => {
                HttpResponse::BadRequest().json(ErrorBody {
                    error: verification.to_string(),
                    locked_until: None,
                    remaining_attempts: Some(*remaining_attempts),
                })
            }

            VerificationError::AttemptsExhausted => HttpResponse::BadRequest().json(ErrorBody {
                error: verification.to_string(),
                locked_until: None,
                remaining_attempts: Some(0),
            }),

            VerificationError::RateLimited { locked_until, .. } => {
                HttpResponse::TooManyRequests().json(ErrorBody {
                    error: verification.to_string(),
                    locked_until: *locked_until,
                    remaining_attempts: None,
                })
            }

            VerificationError::NotifierFailure => {
                HttpResponse::ServiceUnavailable().json(ErrorBody::new(verification.to_string()))
            }
        },

        DomainError::Account(account) => match account {
            AccountError::AccountNotFound => {
                HttpResponse::NotFound().json(ErrorBody::new(account.to_string()))
            }
            AccountError::AccountConflict => {
                HttpResponse::Conflict().json(ErrorBody::new(account.to_string()))
            }
        },

        DomainError::Internal { message } => {
            error!("Internal error: {}", message);
            HttpResponse::InternalServerError()
                .json(ErrorBody::new("Internal server error"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (
                DomainError::Validation {
                    message: "bad".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                VerificationError::ChallengeNotFound.into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                VerificationError::ChallengeExpired.into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                VerificationError::CodeMismatch {
                    remaining_attempts: 4,
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                VerificationError::AttemptsExhausted.into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                VerificationError::RateLimited {
                    locked_until: None,
                    retry_after_seconds: Some(60),
                }
                .into(),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                VerificationError::NotifierFailure.into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AccountError::AccountNotFound.into(), StatusCode::NOT_FOUND),
            (AccountError::AccountConflict.into(), StatusCode::CONFLICT),
            (
                DomainError::Internal {
                    message: "boom".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(to_http_response(&err).status(), expected, "{:?}", err);
        }
    }
}
