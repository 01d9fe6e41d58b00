//! Business services containing domain logic and use cases.

pub mod identity;
pub mod verification;

// Re-export commonly used types
pub use identity::{AuthOutcome, IdentityFlow, IdentityService, Session, SessionIssuer};
pub use verification::{
    ChallengeSweeper, Notifier, SendOtpOutcome, SweeperConfig, VerificationConfig,
    VerificationService,
};
