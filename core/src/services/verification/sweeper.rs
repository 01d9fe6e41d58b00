//! Periodic sweep deleting expired challenges
//!
//! Bounds storage growth only. Expiry is re-checked on every read, so the
//! sweep may be skipped indefinitely without breaking any invariant.

use std::sync::Arc;
use tracing::{error, info};

use crate::repositories::otp::OtpStore;

/// Configuration for the challenge sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// How often to run the sweep (in seconds)
    pub interval_seconds: u64,
    /// Whether the background task runs at all
    pub enabled: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
            enabled: true,
        }
    }
}

/// Background task deleting expired OTP challenges
pub struct ChallengeSweeper<O: OtpStore + 'static> {
    store: Arc<O>,
    config: SweeperConfig,
}

impl<O: OtpStore> ChallengeSweeper<O> {
    /// Create a new sweeper over the given store
    pub fn new(store: Arc<O>, config: SweeperConfig) -> Self {
        Self { store, config }
    }

    /// Run a single sweep cycle, returning how many challenges were removed
    pub async fn run_once(&self) -> usize {
        match self.store.purge_expired().await {
            Ok(removed) => {
                if removed > 0 {
                    info!(removed = removed, "Purged expired OTP challenges");
                }
                removed
            }
            Err(e) => {
                error!(error = %e, "Challenge sweep failed");
                0
            }
        }
    }

    /// Spawn the periodic sweep loop on the current runtime
    pub fn spawn(self) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a fresh store
            // is not swept at startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.run_once().await;
            }
        }))
    }
}
