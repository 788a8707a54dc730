//! Sliding-window rate limiting for code issuance

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::domain::entities::purpose::CodePurpose;
use crate::errors::{VerificationError, VerificationResult};
use crate::repositories::code::r#trait::CodeRepository;

/// Issuance rate limiter scoped per (subject, purpose) pair.
///
/// Accounts issuance events in the code store itself: every persisted row
/// inside the trailing window counts against the ceiling, regardless of
/// whether the code was since used or expired. Exhausting one purpose's
/// bucket never affects another purpose for the same subject.
pub struct RateLimiter<R: CodeRepository> {
    repository: Arc<R>,
    /// Maximum codes per window
    max_codes: i64,
    /// Window length in minutes
    window_minutes: i64,
}

impl<R: CodeRepository> RateLimiter<R> {
    /// Create a rate limiter over the given store
    pub fn new(repository: Arc<R>, max_codes: i64, window_minutes: i64) -> Self {
        Self {
            repository,
            max_codes,
            window_minutes,
        }
    }

    /// Check whether a new code may be issued at `now`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Below the ceiling; the caller may proceed to issue
    /// * `Err(RateLimitExceeded)` - Ceiling reached; carries the minutes
    ///   until the oldest issuance leaves the window
    pub async fn check(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        now: DateTime<Utc>,
    ) -> VerificationResult<()> {
        let window_start = now - Duration::minutes(self.window_minutes);

        let issued = self
            .repository
            .count_issued_since(subject_id, purpose, window_start)
            .await?;

        if issued < self.max_codes {
            return Ok(());
        }

        let wait_minutes = self.wait_minutes(subject_id, purpose, now, window_start).await?;

        warn!(
            subject_id = %subject_id,
            purpose = %purpose,
            issued = issued,
            limit = self.max_codes,
            wait_minutes = wait_minutes,
            event = "rate_limit_exceeded",
            "Code issuance rejected by sliding-window ceiling"
        );

        Err(VerificationError::RateLimitExceeded { wait_minutes })
    }

    /// Minutes until the oldest in-window issuance slides out, rounded up
    /// with a floor of one minute so callers never see a zero-length wait
    async fn wait_minutes(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        now: DateTime<Utc>,
        window_start: DateTime<Utc>,
    ) -> VerificationResult<u32> {
        let in_window = self
            .repository
            .list_issued_since(subject_id, purpose, window_start)
            .await?;

        Ok(match in_window.first() {
            Some(oldest) => {
                let elapsed = (now - oldest.created_at).num_seconds().max(0);
                let remaining = self.window_minutes * 60 - elapsed;
                (((remaining + 59) / 60).max(1)) as u32
            }
            None => self.window_minutes.max(1) as u32,
        })
    }
}
