//! Main verification service implementation

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing;

use rl_shared::utils::phone::{is_valid_mobile, mask_mobile};

use crate::domain::entities::account::Role;
use crate::domain::entities::otp_challenge::CODE_LENGTH;
use crate::domain::entities::rate_limit_record::LimitKind;
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::otp::OtpStore;
use crate::repositories::rate_limit::RateLimiter;

use super::config::VerificationConfig;
use super::traits::Notifier;
use super::types::SendOtpOutcome;

/// Verification service composing the OTP store, rate limiter, and
/// notifier into the send/verify protocol
///
/// Policy lives here, not in the collaborators: sends are windowed but
/// never hard-lock, while an exhausted challenge escalates to an explicit
/// verify lock.
pub struct VerificationService<O, R, N>
where
    O: OtpStore,
    R: RateLimiter,
    N: Notifier,
{
    /// Challenge store
    otp_store: Arc<O>,
    /// Per-identifier rate limiter
    rate_limiter: Arc<R>,
    /// Code delivery collaborator
    notifier: Arc<N>,
    /// Service configuration
    config: VerificationConfig,
}

impl<O, R, N> VerificationService<O, R, N>
where
    O: OtpStore,
    R: RateLimiter,
    N: Notifier,
{
    /// Create a new verification service
    pub fn new(
        otp_store: Arc<O>,
        rate_limiter: Arc<R>,
        notifier: Arc<N>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            otp_store,
            rate_limiter,
            notifier,
            config,
        }
    }

    /// The challenge store this service fronts
    pub fn otp_store(&self) -> &Arc<O> {
        &self.otp_store
    }

    /// Rate-limit scope key: mobile and role each hold their own budget
    fn limit_identifier(mobile: &str, role: Role) -> String {
        format!("{}:{}", mobile, role.as_str())
    }

    /// Send a verification code to a mobile number
    ///
    /// This method:
    /// 1. Validates the mobile number format
    /// 2. Checks the per-identifier send window
    /// 3. Issues a fresh challenge, replacing any prior one
    /// 4. Hands the code to the notifier
    ///
    /// # Arguments
    ///
    /// * `mobile` - The 10-digit mobile number
    /// * `role` - The account class the challenge is scoped to
    ///
    /// # Returns
    ///
    /// * `Ok(SendOtpOutcome)` - Expiry, resend time, and (dev only) the code
    /// * `Err(DomainError)` - Typed refusal: `Validation`, `RateLimited`,
    ///   or `NotifierFailure`
    pub async fn send_otp(&self, mobile: &str, role: Role) -> DomainResult<SendOtpOutcome> {
        if !is_valid_mobile(mobile) {
            return Err(DomainError::Validation {
                message: format!("Invalid mobile number: {}", mask_mobile(mobile)),
            });
        }

        let identifier = Self::limit_identifier(mobile, role);

        let decision = self
            .rate_limiter
            .check(
                &identifier,
                LimitKind::OtpSend,
                self.config.send_max_per_window,
                self.config.send_window_minutes,
            )
            .await?;

        if !decision.allowed {
            tracing::warn!(
                mobile = %mask_mobile(mobile),
                role = %role,
                event = "otp_send_rate_limited",
                "OTP send refused by rate limit"
            );
            return Err(VerificationError::RateLimited {
                locked_until: decision.locked_until,
                retry_after_seconds: decision.retry_after_seconds,
            }
            .into());
        }

        self.rate_limiter.record(&identifier, LimitKind::OtpSend).await?;

        let challenge = self.otp_store.issue(mobile, role).await?;

        tracing::info!(
            mobile = %mask_mobile(mobile),
            role = %role,
            challenge_id = %challenge.id,
            event = "otp_issued",
            "Issued verification code"
        );

        let message_id = self
            .notifier
            .deliver_code(mobile, &challenge.code)
            .await
            .map_err(|e| {
                tracing::error!(
                    mobile = %mask_mobile(mobile),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver verification code"
                );
                DomainError::from(VerificationError::NotifierFailure)
            })?;

        let otp = if self.config.expose_otp_in_response {
            Some(challenge.code.clone())
        } else {
            None
        };

        Ok(SendOtpOutcome {
            expires_at: challenge.expires_at,
            next_resend_at: Utc::now() + Duration::seconds(self.config.resend_cooldown_seconds),
            message_id,
            otp,
        })
    }

    /// Verify a submitted code against the live challenge
    ///
    /// This method:
    /// 1. Checks the code format
    /// 2. Checks the per-identifier verify window and any active lock
    /// 3. Charges the attempt against the challenge and compares
    /// 4. Escalates to a timed lock when the challenge's attempts run out
    ///
    /// On success the challenge is left consumed (not cleared) so the
    /// subsequent registration or login call can confirm that this exact
    /// verification authorized the account operation.
    ///
    /// # Arguments
    ///
    /// * `mobile` - The 10-digit mobile number
    /// * `role` - The account class the challenge is scoped to
    /// * `code` - The submitted 6-digit code
    pub async fn verify_otp(&self, mobile: &str, role: Role, code: &str) -> DomainResult<()> {
        if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::Validation {
                message: "Verification code must be 6 digits".to_string(),
            });
        }

        let identifier = Self::limit_identifier(mobile, role);

        let decision = self
            .rate_limiter
            .check(
                &identifier,
                LimitKind::OtpVerify,
                self.config.verify_max_per_window,
                self.config.verify_window_minutes,
            )
            .await?;

        if !decision.allowed {
            tracing::warn!(
                mobile = %mask_mobile(mobile),
                role = %role,
                event = "otp_verify_rate_limited",
                "OTP verify refused by rate limit"
            );
            return Err(VerificationError::RateLimited {
                locked_until: decision.locked_until,
                retry_after_seconds: decision.retry_after_seconds,
            }
            .into());
        }

        self.rate_limiter.record(&identifier, LimitKind::OtpVerify).await?;

        let report = self.otp_store.attempt_verify(mobile, role, code).await?;

        if report.matched {
            tracing::info!(
                mobile = %mask_mobile(mobile),
                role = %role,
                event = "otp_verified",
                "Verification code matched"
            );
            return Ok(());
        }

        if report.remaining_attempts == 0 {
            // The challenge is spent; refuse further verify traffic for a
            // while rather than letting the attacker mint a fresh
            // challenge and continue guessing.
            self.rate_limiter
                .lock(&identifier, LimitKind::OtpVerify, self.config.verify_lock_minutes)
                .await?;

            tracing::warn!(
                mobile = %mask_mobile(mobile),
                role = %role,
                lock_minutes = self.config.verify_lock_minutes,
                event = "otp_verify_locked",
                "Attempts exhausted; verify lock set"
            );
        }

        tracing::warn!(
            mobile = %mask_mobile(mobile),
            role = %role,
            remaining_attempts = report.remaining_attempts,
            event = "otp_mismatch",
            "Verification code mismatch"
        );

        Err(VerificationError::CodeMismatch {
            remaining_attempts: report.remaining_attempts,
        }
        .into())
    }
}
