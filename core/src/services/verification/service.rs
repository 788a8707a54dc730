//! Main verification engine implementation

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::purpose::CodePurpose;
use crate::domain::entities::verification_code::VerificationCode;
use crate::errors::{VerificationError, VerificationResult};
use crate::repositories::code::r#trait::CodeRepository;

use super::config::VerificationConfig;
use super::generator::CodeGenerator;
use super::hasher::CodeHasher;
use super::rate_limiter::RateLimiter;
use super::traits::NotifierTrait;
use super::types::{IssuedCode, Recipient};

/// Verification engine orchestrating code issuance and confirmation
///
/// The only component callers interact with directly. Collaborators are
/// injected at construction and shared via `Arc`; the engine holds no
/// ambient global state.
pub struct VerificationService<R: CodeRepository, N: NotifierTrait> {
    /// Code store
    repository: Arc<R>,
    /// Out-of-band delivery channel
    notifier: Arc<N>,
    /// Engine configuration
    config: VerificationConfig,
    /// Plaintext code generator
    generator: CodeGenerator,
    /// Digest hasher bound to the server-side secret
    hasher: CodeHasher,
    /// Issuance rate limiter
    rate_limiter: RateLimiter<R>,
    /// Per-(subject, purpose) critical sections.
    ///
    /// Issuance must make its window-count check and insert atomically, and
    /// confirmation must make its read-check-write atomically; both take
    /// the pair's mutex for the duration of the operation. Entries with no
    /// in-flight holder are pruned on the next acquisition, so the map only
    /// ever holds pairs with active operations.
    pair_locks: Mutex<HashMap<(Uuid, CodePurpose), Arc<Mutex<()>>>>,
}

impl<R, N> VerificationService<R, N>
where
    R: CodeRepository,
    N: NotifierTrait + 'static,
{
    /// Create a new verification engine
    ///
    /// # Arguments
    ///
    /// * `repository` - Code store implementation
    /// * `notifier` - Delivery channel implementation
    /// * `config` - Engine configuration, read once here
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: VerificationConfig) -> Self {
        let rate_limiter = RateLimiter::new(
            Arc::clone(&repository),
            config.rate_limit_max_codes,
            config.rate_limit_window_minutes,
        );
        let hasher = CodeHasher::new(config.hashing_secret.clone());

        Self {
            repository,
            notifier,
            config,
            generator: CodeGenerator::new(),
            hasher,
            rate_limiter,
            pair_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a new verification code
    ///
    /// Runs the rate-limit check (fails closed), generates and hashes a
    /// fresh code, persists the new active row, then dispatches delivery
    /// fire-and-forget. A notifier failure does not roll back issuance:
    /// the code stays valid even if the message never arrives.
    ///
    /// # Arguments
    ///
    /// * `subject_id` - The account to issue for
    /// * `purpose` - The purpose bucket the code belongs to
    /// * `recipient` - Delivery destination and display name
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedCode)` - The plaintext (for the caller) and the stored row
    /// * `Err(RateLimitExceeded)` - Ceiling hit; nothing generated or stored
    /// * `Err(Store)` - Persistence failed; fatal to this call
    pub async fn issue(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        recipient: &Recipient,
    ) -> VerificationResult<IssuedCode> {
        let pair_lock = self.pair_lock(subject_id, purpose).await;
        let _guard = pair_lock.lock().await;

        let now = Utc::now();
        self.rate_limiter.check(subject_id, purpose, now).await?;

        let plaintext = self.generator.generate(self.config.code_length);
        let (digest, salt) = self.hasher.hash(&plaintext);

        let code = self
            .repository
            .insert(VerificationCode::new(
                subject_id,
                purpose,
                digest,
                salt,
                self.config.code_ttl_minutes,
            ))
            .await?;

        info!(
            subject_id = %subject_id,
            purpose = %purpose,
            code_id = %code.id,
            expires_at = %code.expires_at,
            event = "code_issued",
            "Issued new verification code"
        );

        self.dispatch_notification(purpose, recipient, &plaintext, code.id);

        Ok(IssuedCode { plaintext, code })
    }

    /// Confirm a verification code
    ///
    /// Looks up the most recent active row for the pair, enforces the
    /// lockout cap, validates the digest in constant time, and on success
    /// marks the row used and bulk-invalidates every other unused row of
    /// the same pair so stale codes can never be replayed.
    ///
    /// All confirmation failures surface as `InvalidOrExpiredCode`; the
    /// caller cannot tell a wrong guess from a dead code.
    pub async fn confirm(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        plaintext: &str,
    ) -> VerificationResult<()> {
        let pair_lock = self.pair_lock(subject_id, purpose).await;
        let _guard = pair_lock.lock().await;

        let now = Utc::now();
        let code = match self
            .repository
            .most_recent_active(subject_id, purpose, now)
            .await?
        {
            Some(code) => code,
            None => {
                // Expired rows fall in here too: a guess against a dead
                // code is indistinguishable from "not found" and does not
                // increment anything
                warn!(
                    subject_id = %subject_id,
                    purpose = %purpose,
                    event = "confirm_no_active_code",
                    "Confirmation attempted with no active code"
                );
                return Err(VerificationError::InvalidOrExpiredCode);
            }
        };

        if code.is_locked(self.config.max_attempts) {
            warn!(
                subject_id = %subject_id,
                purpose = %purpose,
                code_id = %code.id,
                attempts = code.attempts,
                event = "confirm_code_locked",
                "Confirmation attempted against a locked code"
            );
            return Err(VerificationError::InvalidOrExpiredCode);
        }

        if !self.hasher.verify(plaintext, &code.code_digest, &code.salt) {
            self.repository.increment_attempts(code.id).await?;
            warn!(
                subject_id = %subject_id,
                purpose = %purpose,
                code_id = %code.id,
                attempts = code.attempts + 1,
                event = "confirm_code_mismatch",
                "Verification code mismatch"
            );
            return Err(VerificationError::InvalidOrExpiredCode);
        }

        self.repository.mark_used(code.id, now).await?;
        self.repository
            .mark_all_unused_as_used(subject_id, purpose, now)
            .await?;

        info!(
            subject_id = %subject_id,
            purpose = %purpose,
            code_id = %code.id,
            event = "code_confirmed",
            "Verification code confirmed; superseded codes invalidated"
        );

        Ok(())
    }

    /// Remaining confirmation attempts on the currently active code
    ///
    /// `None` when no active code exists. A UX hint only; the engine never
    /// reveals this through `confirm` failures.
    pub async fn remaining_attempts(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
    ) -> VerificationResult<Option<i32>> {
        let code = self
            .repository
            .most_recent_active(subject_id, purpose, Utc::now())
            .await?;

        Ok(code.map(|c| c.remaining_attempts(self.config.max_attempts)))
    }

    /// Whether an active (confirmable) code currently exists for the pair
    pub async fn active_code_exists(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
    ) -> VerificationResult<bool> {
        let now = Utc::now();
        let code = self
            .repository
            .most_recent_active(subject_id, purpose, now)
            .await?;

        Ok(code
            .map(|c| c.is_active(now, self.config.max_attempts))
            .unwrap_or(false))
    }

    /// Fire-and-forget delivery of the plaintext code
    fn dispatch_notification(
        &self,
        purpose: CodePurpose,
        recipient: &Recipient,
        plaintext: &str,
        code_id: Uuid,
    ) {
        let notifier = Arc::clone(&self.notifier);
        let destination = recipient.destination.clone();
        let name = recipient.name.clone();
        let code = plaintext.to_string();
        let expiry_minutes = self.config.code_ttl_minutes;

        tokio::spawn(async move {
            if let Err(e) = notifier
                .dispatch(&destination, purpose, &code, &name, expiry_minutes)
                .await
            {
                // Best-effort boundary: log and move on
                warn!(
                    purpose = %purpose,
                    code_id = %code_id,
                    error = %e,
                    event = "notify_dispatch_failed",
                    "Failed to dispatch verification code notification"
                );
            }
        });
    }

    /// Get or create the mutex guarding a (subject, purpose) pair
    ///
    /// Holding the registry lock makes the prune safe: a strong count of 1
    /// means only the map references the mutex, and no new holder can
    /// appear until the registry lock is released.
    async fn pair_lock(&self, subject_id: Uuid, purpose: CodePurpose) -> Arc<Mutex<()>> {
        let mut locks = self.pair_locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(
            locks
                .entry((subject_id, purpose))
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    #[cfg(test)]
    pub(crate) async fn pair_lock_count(&self) -> usize {
        self.pair_locks.lock().await.len()
    }
}
