//! Log-line notifier
//!
//! The deployment's acknowledged stand-in for an SMS gateway: delivery is
//! a structured log line plus a synthetic message id. Also used by tests
//! that need a counting, optionally failing notifier.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use rl_core::services::verification::Notifier;
use rl_shared::utils::phone::{is_valid_mobile, mask_mobile};

/// Notifier that logs codes instead of sending them
#[derive(Clone)]
pub struct LogNotifier {
    /// Counter for messages delivered
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl LogNotifier {
    /// Create a new log notifier
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Create a notifier that fails every delivery
    pub fn failing() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: true,
        }
    }

    /// Total number of messages delivered
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver_code(&self, mobile: &str, code: &str) -> Result<String, String> {
        if !is_valid_mobile(mobile) {
            return Err(format!("Invalid mobile number: {}", mask_mobile(mobile)));
        }

        if self.simulate_failure {
            warn!(
                mobile = %mask_mobile(mobile),
                "Log notifier simulating delivery failure"
            );
            return Err("Simulated delivery failure".to_string());
        }

        let message_id = format!("log_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            target: "notifier",
            provider = "log",
            mobile = %mask_mobile(mobile),
            code = code,
            message_id = %message_id,
            delivered = count,
            "Verification code delivered (log)"
        );

        Ok(message_id)
    }
}
