//! MySQL implementation of the code store contract
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE verification_codes (
//!     id          CHAR(36)    PRIMARY KEY,
//!     subject_id  CHAR(36)    NOT NULL,
//!     purpose     SMALLINT    NOT NULL,
//!     code_digest CHAR(64)    NOT NULL,
//!     salt        CHAR(32)    NOT NULL,
//!     attempts    INT         NOT NULL DEFAULT 0,
//!     is_used     BOOLEAN     NOT NULL DEFAULT FALSE,
//!     created_at  DATETIME(6) NOT NULL,
//!     expires_at  DATETIME(6) NOT NULL,
//!     used_at     DATETIME(6) NULL,
//!     INDEX idx_subject_purpose_created (subject_id, purpose, created_at)
//! );
//! ```
//!
//! Rows are never deleted here; retention is a housekeeping concern outside
//! the engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Pool, Row};
use tracing::{debug, error};
use uuid::Uuid;

use otp_core::domain::entities::purpose::CodePurpose;
use otp_core::domain::entities::verification_code::VerificationCode;
use otp_core::errors::VerificationError;
use otp_core::repositories::code::CodeRepository;

/// MySQL-backed code repository
pub struct MySqlCodeRepository {
    /// Database connection pool
    pool: Pool<MySql>,
}

impl MySqlCodeRepository {
    /// Create a new repository over an existing connection pool
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    fn store_error(context: &str, e: impl std::fmt::Display) -> VerificationError {
        VerificationError::Store {
            message: format!("{}: {}", context, e),
        }
    }

    fn row_to_code(row: &MySqlRow) -> Result<VerificationCode, VerificationError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| Self::store_error("failed to read id", e))?;
        let subject_id: String = row
            .try_get("subject_id")
            .map_err(|e| Self::store_error("failed to read subject_id", e))?;
        let purpose_code: i16 = row
            .try_get("purpose")
            .map_err(|e| Self::store_error("failed to read purpose", e))?;

        let purpose = CodePurpose::from_code(purpose_code).ok_or_else(|| {
            VerificationError::Store {
                message: format!("unknown purpose code in store: {}", purpose_code),
            }
        })?;

        Ok(VerificationCode {
            id: id
                .parse::<Uuid>()
                .map_err(|e| Self::store_error("malformed id in store", e))?,
            subject_id: subject_id
                .parse::<Uuid>()
                .map_err(|e| Self::store_error("malformed subject_id in store", e))?,
            purpose,
            code_digest: row
                .try_get("code_digest")
                .map_err(|e| Self::store_error("failed to read code_digest", e))?,
            salt: row
                .try_get("salt")
                .map_err(|e| Self::store_error("failed to read salt", e))?,
            attempts: row
                .try_get("attempts")
                .map_err(|e| Self::store_error("failed to read attempts", e))?,
            is_used: row
                .try_get("is_used")
                .map_err(|e| Self::store_error("failed to read is_used", e))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| Self::store_error("failed to read created_at", e))?,
            expires_at: row
                .try_get("expires_at")
                .map_err(|e| Self::store_error("failed to read expires_at", e))?,
            used_at: row
                .try_get("used_at")
                .map_err(|e| Self::store_error("failed to read used_at", e))?,
        })
    }
}

#[async_trait]
impl CodeRepository for MySqlCodeRepository {
    async fn insert(
        &self,
        code: VerificationCode,
    ) -> Result<VerificationCode, VerificationError> {
        let query = r#"
            INSERT INTO verification_codes (
                id, subject_id, purpose, code_digest, salt,
                attempts, is_used, created_at, expires_at, used_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(code.id.to_string())
            .bind(code.subject_id.to_string())
            .bind(code.purpose.as_code())
            .bind(&code.code_digest)
            .bind(&code.salt)
            .bind(code.attempts)
            .bind(code.is_used)
            .bind(code.created_at)
            .bind(code.expires_at)
            .bind(code.used_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    code_id = %code.id,
                    error = %e,
                    "Failed to insert verification code"
                );
                Self::store_error("failed to insert verification code", e)
            })?;

        debug!(code_id = %code.id, "Inserted verification code row");

        Ok(code)
    }

    async fn most_recent_active(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, VerificationError> {
        let query = r#"
            SELECT id, subject_id, purpose, code_digest, salt,
                   attempts, is_used, created_at, expires_at, used_at
            FROM verification_codes
            WHERE subject_id = ? AND purpose = ?
              AND is_used = FALSE AND expires_at > ?
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(subject_id.to_string())
            .bind(purpose.as_code())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    subject_id = %subject_id,
                    purpose = %purpose,
                    error = %e,
                    "Failed to query active verification code"
                );
                Self::store_error("failed to query active verification code", e)
            })?;

        row.as_ref().map(Self::row_to_code).transpose()
    }

    async fn count_issued_since(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        since: DateTime<Utc>,
    ) -> Result<i64, VerificationError> {
        let query = r#"
            SELECT COUNT(*) AS issued
            FROM verification_codes
            WHERE subject_id = ? AND purpose = ? AND created_at >= ?
        "#;

        let row = sqlx::query(query)
            .bind(subject_id.to_string())
            .bind(purpose.as_code())
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::store_error("failed to count issued codes", e))?;

        row.try_get("issued")
            .map_err(|e| Self::store_error("failed to read issued count", e))
    }

    async fn list_issued_since(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        since: DateTime<Utc>,
    ) -> Result<Vec<VerificationCode>, VerificationError> {
        let query = r#"
            SELECT id, subject_id, purpose, code_digest, salt,
                   attempts, is_used, created_at, expires_at, used_at
            FROM verification_codes
            WHERE subject_id = ? AND purpose = ? AND created_at >= ?
            ORDER BY created_at ASC, id ASC
        "#;

        let rows = sqlx::query(query)
            .bind(subject_id.to_string())
            .bind(purpose.as_code())
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::store_error("failed to list issued codes", e))?;

        rows.iter().map(Self::row_to_code).collect()
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<(), VerificationError> {
        // Guarded so a row confirmed by a concurrent call is left alone
        let query = r#"
            UPDATE verification_codes
            SET attempts = attempts + 1
            WHERE id = ? AND is_used = FALSE
        "#;

        sqlx::query(query)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(code_id = %id, error = %e, "Failed to increment attempts");
                Self::store_error("failed to increment attempts", e)
            })?;

        Ok(())
    }

    async fn mark_used(
        &self,
        id: Uuid,
        used_at: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        // is_used is monotonic: never overwrite an earlier used_at
        let query = r#"
            UPDATE verification_codes
            SET is_used = TRUE, used_at = ?
            WHERE id = ? AND is_used = FALSE
        "#;

        sqlx::query(query)
            .bind(used_at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(code_id = %id, error = %e, "Failed to mark code as used");
                Self::store_error("failed to mark code as used", e)
            })?;

        debug!(code_id = %id, "Marked verification code as used");

        Ok(())
    }

    async fn mark_all_unused_as_used(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        used_at: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        let query = r#"
            UPDATE verification_codes
            SET is_used = TRUE, used_at = ?
            WHERE subject_id = ? AND purpose = ? AND is_used = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(used_at)
            .bind(subject_id.to_string())
            .bind(purpose.as_code())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    subject_id = %subject_id,
                    purpose = %purpose,
                    error = %e,
                    "Failed to invalidate superseded codes"
                );
                Self::store_error("failed to invalidate superseded codes", e)
            })?;

        debug!(
            subject_id = %subject_id,
            purpose = %purpose,
            invalidated = result.rows_affected(),
            "Invalidated superseded verification codes"
        );

        Ok(())
    }
}
