//! Verification code entity for one-time code authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::purpose::CodePurpose;

/// Maximum number of failed confirmation attempts allowed per code
pub const MAX_ATTEMPTS: i32 = 5;

/// Length of the plaintext verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (15 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 15;

/// One issued verification code instance.
///
/// The plaintext code is never stored; only its salted digest is. A row is
/// "active" while it is unused, unexpired and below the attempt cap. All
/// other states (confirmed, expired, locked, invalidated) are terminal:
/// `attempts` never decreases and `is_used` only ever goes false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Unique identifier for the code instance
    pub id: Uuid,

    /// Account the code was issued for
    pub subject_id: Uuid,

    /// Functional reason the code was issued
    pub purpose: CodePurpose,

    /// Salted SHA-256 digest of the plaintext code, hex encoded
    pub code_digest: String,

    /// Per-code random salt used in digest computation, hex encoded
    pub salt: String,

    /// Number of failed confirmation attempts made against this code
    pub attempts: i32,

    /// Whether the code has been confirmed or invalidated
    pub is_used: bool,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp of confirmation/invalidation, `None` until set
    pub used_at: Option<DateTime<Utc>>,
}

impl VerificationCode {
    /// Creates a new active code row from a precomputed digest and salt
    ///
    /// # Arguments
    ///
    /// * `subject_id` - The account the code is issued for
    /// * `purpose` - The functional reason for issuance
    /// * `code_digest` - Hex digest of the plaintext (see `CodeHasher`)
    /// * `salt` - Hex salt the digest was computed with
    /// * `expiration_minutes` - Minutes until the code expires
    pub fn new(
        subject_id: Uuid,
        purpose: CodePurpose,
        code_digest: String,
        salt: String,
        expiration_minutes: i64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            subject_id,
            purpose,
            code_digest,
            salt,
            attempts: 0,
            is_used: false,
            created_at: now,
            expires_at: now + Duration::minutes(expiration_minutes),
            used_at: None,
        }
    }

    /// Checks if the code has expired at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks if the code is locked by the attempt cap
    ///
    /// Once locked, the code is permanently unconfirmable even if unexpired.
    pub fn is_locked(&self, max_attempts: i32) -> bool {
        self.attempts >= max_attempts
    }

    /// Checks if the code is still active at the given instant
    ///
    /// A code is active if it hasn't been used, hasn't expired and the
    /// attempt cap hasn't been reached.
    pub fn is_active(&self, now: DateTime<Utc>, max_attempts: i32) -> bool {
        !self.is_used && !self.is_expired(now) && !self.is_locked(max_attempts)
    }

    /// Gets the number of remaining confirmation attempts
    pub fn remaining_attempts(&self, max_attempts: i32) -> i32 {
        (max_attempts - self.attempts).max(0)
    }

    /// Marks the code as used at the given instant
    ///
    /// Idempotent: a row that is already used keeps its original `used_at`.
    pub fn mark_used(&mut self, used_at: DateTime<Utc>) {
        if !self.is_used {
            self.is_used = true;
            self.used_at = Some(used_at);
        }
    }
}
