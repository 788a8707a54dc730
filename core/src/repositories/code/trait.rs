//! Code repository trait defining the storage contract for code records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::purpose::CodePurpose;
use crate::domain::entities::verification_code::VerificationCode;
use crate::errors::VerificationError;

/// Repository trait for VerificationCode persistence operations
///
/// This trait is the narrow contract the engine requires from its storage
/// backend (SQL, key-value or in-memory). The engine never deletes rows;
/// retention is a store-level housekeeping concern.
///
/// # Security Considerations
/// - Rows carry digests, never plaintext codes
/// - `mark_used` and `mark_all_unused_as_used` must be monotonic:
///   a used row is never reverted to unused
#[async_trait]
pub trait CodeRepository: Send + Sync {
    /// Persist a new code row
    ///
    /// # Arguments
    /// * `code` - The VerificationCode entity to persist
    ///
    /// # Returns
    /// * `Ok(VerificationCode)` - The saved row
    /// * `Err(VerificationError)` - Save failed
    async fn insert(
        &self,
        code: VerificationCode,
    ) -> Result<VerificationCode, VerificationError>;

    /// Find the most recent unused, unexpired row for a subject and purpose
    ///
    /// Ordered by `created_at` descending, ties broken by highest id, so a
    /// freshly issued code always shadows its predecessors. Rows at or past
    /// their attempt cap are still returned; the engine treats them as
    /// locked rather than absent so a late correct guess cannot revive them.
    ///
    /// # Arguments
    /// * `subject_id` - The account to look up
    /// * `purpose` - The purpose bucket to look in
    /// * `now` - The instant to evaluate expiry against
    async fn most_recent_active(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, VerificationError>;

    /// Count rows issued to a subject and purpose since the given instant
    ///
    /// Counts every issuance regardless of used/expired state; the rate
    /// limiter accounts for send events, not code validity.
    async fn count_issued_since(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        since: DateTime<Utc>,
    ) -> Result<i64, VerificationError>;

    /// List rows issued to a subject and purpose since the given instant,
    /// oldest first
    ///
    /// Used to compute the wait hint when the rate ceiling is hit.
    async fn list_issued_since(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        since: DateTime<Utc>,
    ) -> Result<Vec<VerificationCode>, VerificationError>;

    /// Increment the failed-attempt counter of a row
    async fn increment_attempts(&self, id: Uuid) -> Result<(), VerificationError>;

    /// Mark a single row as used at the given instant
    async fn mark_used(
        &self,
        id: Uuid,
        used_at: DateTime<Utc>,
    ) -> Result<(), VerificationError>;

    /// Mark every still-unused row for a subject and purpose as used
    ///
    /// Called when a code is confirmed so stale codes from prior issuances
    /// can never be replayed.
    async fn mark_all_unused_as_used(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        used_at: DateTime<Utc>,
    ) -> Result<(), VerificationError>;
}
