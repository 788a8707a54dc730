//! Logging notifier for development and testing
//!
//! Writes the dispatch to the log instead of delivering it. Useful as the
//! notifier in local environments, demos and tests; production deployments
//! plug in a real channel (mail/SMS gateway) behind the same trait.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use otp_core::domain::entities::purpose::CodePurpose;
use otp_core::services::verification::NotifierTrait;

/// Notifier that logs deliveries instead of sending them
#[derive(Clone)]
pub struct LoggingNotifier {
    /// Counter for tracking number of dispatched messages
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl LoggingNotifier {
    /// Create a new logging notifier
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Create a notifier whose every dispatch fails
    pub fn with_simulated_failure() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: true,
        }
    }

    /// Get the total number of messages dispatched
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// Mask a destination for logging: keep a short suffix only.
    ///
    /// Counts characters, not bytes, so internationalized addresses never
    /// split a multibyte sequence.
    fn mask_destination(destination: &str) -> String {
        let chars: Vec<char> = destination.chars().collect();
        if chars.len() <= 4 {
            "****".to_string()
        } else {
            let suffix: String = chars[chars.len() - 4..].iter().collect();
            format!("***{}", suffix)
        }
    }
}

impl Default for LoggingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifierTrait for LoggingNotifier {
    async fn dispatch(
        &self,
        destination: &str,
        purpose: CodePurpose,
        code: &str,
        name: &str,
        expiry_minutes: i64,
    ) -> Result<(), String> {
        if self.simulate_failure {
            warn!(
                destination = %Self::mask_destination(destination),
                purpose = %purpose,
                "Simulated notifier failure"
            );
            return Err("simulated notifier failure".to_string());
        }

        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            destination = %Self::mask_destination(destination),
            purpose = %purpose,
            recipient = name,
            code = code,
            expiry_minutes = expiry_minutes,
            event = "code_dispatched",
            "Verification code dispatched (logging notifier)"
        );

        Ok(())
    }
}
