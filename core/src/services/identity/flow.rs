//! Client-side identity flow state machine
//!
//! The dialog that fronts the OTP protocol: collect a mobile number, then
//! a code under a 300-second countdown with an independent 60-second
//! resend cooldown, then either a registration form or a direct
//! authenticated exit. The machine is pure: every transition is driven by
//! a server response or user action, and the clock is always passed in,
//! so the whole protocol is testable without timers or I/O.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::account::Role;
use crate::domain::entities::otp_challenge::CODE_LENGTH;
use crate::errors::VerificationError;

/// The step the dialog is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    /// Collecting the mobile number
    Mobile,
    /// Collecting the 6-digit code
    Otp,
    /// New account: collecting the profile form
    Register,
    /// Terminal: a session has been issued
    Authenticated,
}

/// Client-held, ephemeral state of one identity dialog
#[derive(Debug, Clone)]
pub struct IdentityFlow {
    step: FlowStep,
    role: Role,
    mobile: Option<String>,
    code_expires_at: Option<DateTime<Utc>>,
    resend_available_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    remaining_attempts: Option<u32>,
    loading: bool,
    must_resend: bool,
}

impl IdentityFlow {
    /// Start a fresh flow for the given account class
    pub fn new(role: Role) -> Self {
        Self {
            step: FlowStep::Mobile,
            role,
            mobile: None,
            code_expires_at: None,
            resend_available_at: None,
            last_error: None,
            remaining_attempts: None,
            loading: false,
            must_resend: false,
        }
    }

    /// The current step
    pub fn step(&self) -> FlowStep {
        self.step
    }

    /// The account class this flow authenticates
    pub fn role(&self) -> Role {
        self.role
    }

    /// The pending mobile number, once submitted
    ///
    /// On the register step the number is rendered read-only: it was
    /// verified, and substituting an unverified one must be impossible.
    pub fn mobile(&self) -> Option<&str> {
        self.mobile.as_deref()
    }

    /// The last error surfaced from the server, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Remaining-attempts hint from the last failed verification
    pub fn remaining_attempts(&self) -> Option<u32> {
        self.remaining_attempts
    }

    /// Whether a request is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the only useful action is requesting a new code
    pub fn must_resend(&self) -> bool {
        self.must_resend
    }

    /// Mark a request as started or finished
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// User submitted a mobile number; a send request is now in flight
    pub fn submit_mobile(&mut self, mobile: String) {
        self.mobile = Some(mobile);
        self.loading = true;
    }

    /// A send (or resend) succeeded: show code entry, restart the
    /// countdown and the resend cooldown, clear any prior error
    pub fn on_send_success(
        &mut self,
        expires_at: DateTime<Utc>,
        next_resend_at: DateTime<Utc>,
    ) {
        self.step = FlowStep::Otp;
        self.code_expires_at = Some(expires_at);
        self.resend_available_at = Some(next_resend_at);
        self.last_error = None;
        self.remaining_attempts = None;
        self.loading = false;
        self.must_resend = false;
    }

    /// A send failed: stay put and surface the error inline
    pub fn on_send_failure(&mut self, message: String) {
        self.last_error = Some(message);
        self.loading = false;
    }

    /// Verification succeeded; branch on whether an account exists
    pub fn on_verify_success(&mut self, account_exists: bool) {
        self.loading = false;
        self.last_error = None;
        self.remaining_attempts = None;
        self.step = if account_exists {
            FlowStep::Authenticated
        } else {
            FlowStep::Register
        };
    }

    /// Verification failed: stay on code entry and surface the reason.
    ///
    /// An expired challenge flips the must-resend latch so the dialog
    /// stops accepting codes and offers a resend instead. Rate-limited
    /// failures are terminal for this attempt; the machine never retries
    /// them on its own.
    pub fn on_verify_failure(&mut self, error: &VerificationError) {
        self.loading = false;
        self.last_error = Some(error.to_string());

        match error {
            VerificationError::CodeMismatch { remaining_attempts } => {
                self.remaining_attempts = Some(*remaining_attempts);
            }
            VerificationError::ChallengeExpired => {
                self.must_resend = true;
                self.remaining_attempts = None;
            }
            VerificationError::AttemptsExhausted
            | VerificationError::ChallengeNotFound
            | VerificationError::RateLimited { .. } => {
                self.must_resend = true;
                self.remaining_attempts = Some(0);
            }
            VerificationError::NotifierFailure => {}
        }
    }

    /// Registration completed: the flow is authenticated
    pub fn on_register_success(&mut self) {
        self.loading = false;
        self.last_error = None;
        self.step = FlowStep::Authenticated;
    }

    /// User chose to change the number: back to mobile entry, all
    /// challenge context discarded (the server-side challenge is left to
    /// expire or be replaced on the next send)
    pub fn change_number(&mut self) {
        *self = Self::new(self.role);
    }

    /// Seconds left on the code countdown (0 when expired or absent)
    pub fn code_seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        self.code_expires_at
            .map(|at| (at - now).num_seconds().max(0))
            .unwrap_or(0)
    }

    /// Seconds left on the resend cooldown (0 when available)
    pub fn resend_seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        self.resend_available_at
            .map(|at| (at - now).num_seconds().max(0))
            .unwrap_or(0)
    }

    /// Whether the resend action is currently available
    pub fn can_resend(&self, now: DateTime<Utc>) -> bool {
        self.step == FlowStep::Otp && self.resend_seconds_remaining(now) == 0
    }

    /// Whether a code input should be auto-submitted: exactly six digits,
    /// nothing in flight, and the challenge still current
    pub fn should_auto_submit(&self, input: &str, now: DateTime<Utc>) -> bool {
        self.step == FlowStep::Otp
            && !self.loading
            && !self.must_resend
            && self.code_seconds_remaining(now) > 0
            && input.len() == CODE_LENGTH
            && input.chars().all(|c| c.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow_at_otp(now: DateTime<Utc>) -> IdentityFlow {
        let mut flow = IdentityFlow::new(Role::Customer);
        flow.submit_mobile("9876543210".to_string());
        flow.on_send_success(now + Duration::seconds(300), now + Duration::seconds(60));
        flow
    }

    #[test]
    fn test_initial_state() {
        let flow = IdentityFlow::new(Role::Driver);
        assert_eq!(flow.step(), FlowStep::Mobile);
        assert_eq!(flow.role(), Role::Driver);
        assert!(flow.mobile().is_none());
        assert!(!flow.is_loading());
    }

    #[test]
    fn test_send_success_moves_to_otp() {
        let now = Utc::now();
        let flow = flow_at_otp(now);

        assert_eq!(flow.step(), FlowStep::Otp);
        assert_eq!(flow.mobile(), Some("9876543210"));
        assert_eq!(flow.code_seconds_remaining(now), 300);
        assert_eq!(flow.resend_seconds_remaining(now), 60);
        assert!(!flow.can_resend(now));
        assert!(!flow.is_loading());
    }

    #[test]
    fn test_send_failure_stays_on_mobile() {
        let mut flow = IdentityFlow::new(Role::Customer);
        flow.submit_mobile("9876543210".to_string());
        flow.on_send_failure("Too many requests. Please try again later".to_string());

        assert_eq!(flow.step(), FlowStep::Mobile);
        assert!(flow.last_error().unwrap().contains("Too many requests"));
        assert!(!flow.is_loading());
    }

    #[test]
    fn test_countdown_and_cooldown_are_independent() {
        let now = Utc::now();
        let flow = flow_at_otp(now);

        let later = now + Duration::seconds(61);
        assert!(flow.can_resend(later));
        assert_eq!(flow.code_seconds_remaining(later), 239);

        let after_expiry = now + Duration::seconds(301);
        assert_eq!(flow.code_seconds_remaining(after_expiry), 0);
    }

    #[test]
    fn test_verify_success_existing_account() {
        let now = Utc::now();
        let mut flow = flow_at_otp(now);

        flow.on_verify_success(true);
        assert_eq!(flow.step(), FlowStep::Authenticated);
    }

    #[test]
    fn test_verify_success_new_account_goes_to_register() {
        let now = Utc::now();
        let mut flow = flow_at_otp(now);

        flow.on_verify_success(false);
        assert_eq!(flow.step(), FlowStep::Register);
        // The verified number is carried into the form.
        assert_eq!(flow.mobile(), Some("9876543210"));
    }

    #[test]
    fn test_verify_mismatch_surfaces_remaining_attempts() {
        let now = Utc::now();
        let mut flow = flow_at_otp(now);

        flow.on_verify_failure(&VerificationError::CodeMismatch {
            remaining_attempts: 4,
        });

        assert_eq!(flow.step(), FlowStep::Otp);
        assert_eq!(flow.remaining_attempts(), Some(4));
        assert!(!flow.must_resend());
    }

    #[test]
    fn test_expired_code_forces_resend() {
        let now = Utc::now();
        let mut flow = flow_at_otp(now);

        flow.on_verify_failure(&VerificationError::ChallengeExpired);

        assert_eq!(flow.step(), FlowStep::Otp);
        assert!(flow.must_resend());
        assert!(!flow.should_auto_submit("123456", now));
    }

    #[test]
    fn test_exhausted_attempts_force_resend() {
        let now = Utc::now();
        let mut flow = flow_at_otp(now);

        flow.on_verify_failure(&VerificationError::AttemptsExhausted);
        assert!(flow.must_resend());
        assert_eq!(flow.remaining_attempts(), Some(0));
    }

    #[test]
    fn test_resend_resets_countdown_and_error() {
        let now = Utc::now();
        let mut flow = flow_at_otp(now);
        flow.on_verify_failure(&VerificationError::ChallengeExpired);
        assert!(flow.must_resend());

        let resend_time = now + Duration::seconds(120);
        flow.on_send_success(
            resend_time + Duration::seconds(300),
            resend_time + Duration::seconds(60),
        );

        assert_eq!(flow.step(), FlowStep::Otp);
        assert!(!flow.must_resend());
        assert!(flow.last_error().is_none());
        assert_eq!(flow.code_seconds_remaining(resend_time), 300);
        assert_eq!(flow.resend_seconds_remaining(resend_time), 60);
    }

    #[test]
    fn test_auto_submit_rule() {
        let now = Utc::now();
        let mut flow = flow_at_otp(now);

        assert!(flow.should_auto_submit("123456", now));
        assert!(!flow.should_auto_submit("12345", now));
        assert!(!flow.should_auto_submit("1234567", now));
        assert!(!flow.should_auto_submit("12345a", now));

        // Not while a request is in flight.
        flow.set_loading(true);
        assert!(!flow.should_auto_submit("123456", now));
        flow.set_loading(false);

        // Not once the countdown has run out.
        let after_expiry = now + Duration::seconds(301);
        assert!(!flow.should_auto_submit("123456", after_expiry));
    }

    #[test]
    fn test_register_success_authenticates() {
        let now = Utc::now();
        let mut flow = flow_at_otp(now);
        flow.on_verify_success(false);
        assert_eq!(flow.step(), FlowStep::Register);

        flow.on_register_success();
        assert_eq!(flow.step(), FlowStep::Authenticated);
    }

    #[test]
    fn test_change_number_discards_context() {
        let now = Utc::now();
        let mut flow = flow_at_otp(now);
        flow.on_verify_failure(&VerificationError::CodeMismatch {
            remaining_attempts: 2,
        });

        flow.change_number();

        assert_eq!(flow.step(), FlowStep::Mobile);
        assert!(flow.mobile().is_none());
        assert!(flow.last_error().is_none());
        assert_eq!(flow.remaining_attempts(), None);
        assert_eq!(flow.code_seconds_remaining(now), 0);
        // The role survives; it was chosen before the dialog opened.
        assert_eq!(flow.role(), Role::Customer);
    }

    #[test]
    fn test_rate_limited_failure_is_not_retryable() {
        let now = Utc::now();
        let mut flow = flow_at_otp(now);

        flow.on_verify_failure(&VerificationError::RateLimited {
            locked_until: Some(now + Duration::minutes(15)),
            retry_after_seconds: Some(900),
        });

        assert!(flow.must_resend());
        assert!(!flow.should_auto_submit("123456", now));
    }
}
