//! Behavioural tests for the send/verify protocol

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::account::Role;
use crate::errors::{DomainError, VerificationError};
use crate::repositories::otp::{MemoryOtpStore, OtpStore};
use crate::repositories::rate_limit::MemoryRateLimiter;
use crate::services::verification::config::VerificationConfig;
use crate::services::verification::service::VerificationService;

use super::mocks::MockNotifier;

const MOBILE: &str = "9876543210";

fn service(
    notifier: MockNotifier,
    config: VerificationConfig,
) -> VerificationService<MemoryOtpStore, MemoryRateLimiter, MockNotifier> {
    VerificationService::new(
        Arc::new(MemoryOtpStore::new()),
        Arc::new(MemoryRateLimiter::new()),
        Arc::new(notifier),
        config,
    )
}

fn dev_config() -> VerificationConfig {
    VerificationConfig {
        expose_otp_in_response: true,
        ..Default::default()
    }
}

fn wrong_code(code: &str) -> &'static str {
    if code == "000000" {
        "111111"
    } else {
        "000000"
    }
}

#[tokio::test]
async fn test_send_returns_expiry_and_dev_code() {
    let service = service(MockNotifier::new(false), dev_config());

    let before = Utc::now();
    let outcome = service.send_otp(MOBILE, Role::Customer).await.unwrap();

    // Expiry is about five minutes out.
    let ttl = (outcome.expires_at - before).num_seconds();
    assert!(ttl > 290 && ttl <= 301, "unexpected ttl: {}", ttl);

    // Resend opens after the 60 second cooldown.
    let cooldown = (outcome.next_resend_at - before).num_seconds();
    assert!(cooldown >= 59 && cooldown <= 61);

    let otp = outcome.otp.expect("dev mode echoes the code");
    assert_eq!(otp.len(), 6);
    assert!(outcome.message_id.starts_with("mock-msg-"));
}

#[tokio::test]
async fn test_send_hides_code_outside_dev() {
    let service = service(MockNotifier::new(false), VerificationConfig::default());
    let outcome = service.send_otp(MOBILE, Role::Customer).await.unwrap();
    assert!(outcome.otp.is_none());
}

#[tokio::test]
async fn test_send_rejects_invalid_mobile() {
    let service = service(MockNotifier::new(false), dev_config());

    for mobile in ["98765", "98765432101", "98765abc10", ""] {
        let err = service.send_otp(mobile, Role::Customer).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}

#[tokio::test]
async fn test_send_delivers_through_notifier() {
    let notifier = MockNotifier::new(false);
    let delivered = Arc::clone(&notifier.delivered);
    let service = service(notifier, dev_config());

    let outcome = service.send_otp(MOBILE, Role::Customer).await.unwrap();
    let sent = delivered.lock().unwrap().get(MOBILE).cloned().unwrap();
    assert_eq!(Some(sent), outcome.otp);
}

#[tokio::test]
async fn test_send_notifier_failure_is_typed() {
    let service = service(MockNotifier::new(true), dev_config());

    let err = service.send_otp(MOBILE, Role::Customer).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::NotifierFailure)
    ));
}

#[tokio::test]
async fn test_sixth_rapid_send_is_rate_limited() {
    let service = service(MockNotifier::new(false), dev_config());

    for _ in 0..5 {
        service.send_otp(MOBILE, Role::Customer).await.unwrap();
    }

    let err = service.send_otp(MOBILE, Role::Customer).await.unwrap_err();
    match err {
        DomainError::Verification(VerificationError::RateLimited {
            locked_until,
            retry_after_seconds,
        }) => {
            // The send window refuses but never hard-locks.
            assert!(locked_until.is_none());
            assert!(retry_after_seconds.unwrap() > 0);
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn test_send_budgets_are_per_role() {
    let service = service(MockNotifier::new(false), dev_config());

    for _ in 0..5 {
        service.send_otp(MOBILE, Role::Customer).await.unwrap();
    }

    // The same mobile as a driver still has a fresh budget.
    service.send_otp(MOBILE, Role::Driver).await.unwrap();
}

#[tokio::test]
async fn test_verify_happy_path_and_replay() {
    let service = service(MockNotifier::new(false), dev_config());

    let outcome = service.send_otp(MOBILE, Role::Customer).await.unwrap();
    let code = outcome.otp.unwrap();

    // Wrong code first: remaining attempts surface.
    let err = service
        .verify_otp(MOBILE, Role::Customer, wrong_code(&code))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::CodeMismatch {
            remaining_attempts: 4
        })
    ));

    // Correct code succeeds.
    service.verify_otp(MOBILE, Role::Customer, &code).await.unwrap();

    // Re-verifying the same code fails: the challenge is consumed.
    let err = service
        .verify_otp(MOBILE, Role::Customer, &code)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::ChallengeNotFound)
    ));
}

#[tokio::test]
async fn test_verify_without_challenge() {
    let service = service(MockNotifier::new(false), dev_config());

    let err = service
        .verify_otp(MOBILE, Role::Customer, "123456")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::ChallengeNotFound)
    ));
}

#[tokio::test]
async fn test_verify_rejects_malformed_code() {
    let service = service(MockNotifier::new(false), dev_config());
    service.send_otp(MOBILE, Role::Customer).await.unwrap();

    for code in ["12345", "1234567", "12345a", ""] {
        let err = service
            .verify_otp(MOBILE, Role::Customer, code)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}

#[tokio::test]
async fn test_exhausting_attempts_sets_verify_lock() {
    let service = service(MockNotifier::new(false), dev_config());

    let outcome = service.send_otp(MOBILE, Role::Customer).await.unwrap();
    let code = outcome.otp.unwrap();
    let wrong = wrong_code(&code);

    for expected_remaining in (0..5).rev() {
        let err = service
            .verify_otp(MOBILE, Role::Customer, wrong)
            .await
            .unwrap_err();
        match err {
            DomainError::Verification(VerificationError::CodeMismatch { remaining_attempts }) => {
                assert_eq!(remaining_attempts, expected_remaining);
            }
            other => panic!("expected CodeMismatch, got {:?}", other),
        }
    }

    // The sixth attempt is refused by the lock, not by the challenge:
    // even the correct code reports RateLimited.
    let err = service
        .verify_otp(MOBILE, Role::Customer, &code)
        .await
        .unwrap_err();
    match err {
        DomainError::Verification(VerificationError::RateLimited { locked_until, .. }) => {
            assert!(locked_until.is_some());
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn test_lock_blocks_fresh_challenges_too() {
    let service = service(MockNotifier::new(false), dev_config());

    let outcome = service.send_otp(MOBILE, Role::Customer).await.unwrap();
    let code = outcome.otp.unwrap();
    let wrong = wrong_code(&code);

    for _ in 0..5 {
        let _ = service.verify_otp(MOBILE, Role::Customer, wrong).await;
    }

    // A fresh challenge does not reset the lock.
    let outcome = service.send_otp(MOBILE, Role::Customer).await.unwrap();
    let fresh_code = outcome.otp.unwrap();

    let err = service
        .verify_otp(MOBILE, Role::Customer, &fresh_code)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::RateLimited { .. })
    ));
}

#[tokio::test]
async fn test_resend_replaces_challenge() {
    let service = service(MockNotifier::new(false), dev_config());

    let first = service.send_otp(MOBILE, Role::Customer).await.unwrap();
    let second = service.send_otp(MOBILE, Role::Customer).await.unwrap();

    let first_code = first.otp.unwrap();
    let second_code = second.otp.unwrap();

    if first_code != second_code {
        // The replaced code can only fail closed.
        let err = service
            .verify_otp(MOBILE, Role::Customer, &first_code)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Verification(VerificationError::CodeMismatch { .. })
        ));
    }

    service
        .verify_otp(MOBILE, Role::Customer, &second_code)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_successful_verify_leaves_consumed_challenge() {
    let service = service(MockNotifier::new(false), dev_config());

    let outcome = service.send_otp(MOBILE, Role::Customer).await.unwrap();
    let code = outcome.otp.unwrap();
    service.verify_otp(MOBILE, Role::Customer, &code).await.unwrap();

    // The consumed challenge stays visible for the account-resolution
    // step until it is explicitly cleared.
    let peeked = service
        .otp_store()
        .peek(MOBILE, Role::Customer)
        .await
        .unwrap()
        .unwrap();
    assert!(peeked.consumed);
}
