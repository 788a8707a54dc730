//! In-memory implementation of the code repository.
//!
//! Backs single-process deployments and the unit tests. Durable storage is
//! provided by the infrastructure crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::purpose::CodePurpose;
use crate::domain::entities::verification_code::VerificationCode;
use crate::errors::VerificationError;

use super::r#trait::CodeRepository;

/// In-memory code repository
pub struct InMemoryCodeRepository {
    codes: Arc<RwLock<HashMap<Uuid, VerificationCode>>>,
}

impl InMemoryCodeRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            codes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Total number of stored rows, used/expired included
    pub async fn len(&self) -> usize {
        self.codes.read().await.len()
    }

    /// Whether the repository holds no rows
    pub async fn is_empty(&self) -> bool {
        self.codes.read().await.is_empty()
    }

    /// Fetch a row by id, for assertions in tests
    pub async fn get(&self, id: Uuid) -> Option<VerificationCode> {
        self.codes.read().await.get(&id).cloned()
    }
}

impl Default for InMemoryCodeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeRepository for InMemoryCodeRepository {
    async fn insert(
        &self,
        code: VerificationCode,
    ) -> Result<VerificationCode, VerificationError> {
        let mut codes = self.codes.write().await;

        if codes.contains_key(&code.id) {
            return Err(VerificationError::Store {
                message: format!("duplicate code id: {}", code.id),
            });
        }

        codes.insert(code.id, code.clone());
        Ok(code)
    }

    async fn most_recent_active(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, VerificationError> {
        let codes = self.codes.read().await;

        Ok(codes
            .values()
            .filter(|c| {
                c.subject_id == subject_id
                    && c.purpose == purpose
                    && !c.is_used
                    && c.expires_at > now
            })
            .max_by_key(|c| (c.created_at, c.id))
            .cloned())
    }

    async fn count_issued_since(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        since: DateTime<Utc>,
    ) -> Result<i64, VerificationError> {
        let codes = self.codes.read().await;

        Ok(codes
            .values()
            .filter(|c| {
                c.subject_id == subject_id && c.purpose == purpose && c.created_at >= since
            })
            .count() as i64)
    }

    async fn list_issued_since(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        since: DateTime<Utc>,
    ) -> Result<Vec<VerificationCode>, VerificationError> {
        let codes = self.codes.read().await;

        let mut issued: Vec<VerificationCode> = codes
            .values()
            .filter(|c| {
                c.subject_id == subject_id && c.purpose == purpose && c.created_at >= since
            })
            .cloned()
            .collect();
        issued.sort_by_key(|c| (c.created_at, c.id));

        Ok(issued)
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<(), VerificationError> {
        let mut codes = self.codes.write().await;

        match codes.get_mut(&id) {
            Some(code) => {
                code.attempts += 1;
                Ok(())
            }
            None => Err(VerificationError::Store {
                message: format!("code not found: {}", id),
            }),
        }
    }

    async fn mark_used(
        &self,
        id: Uuid,
        used_at: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        let mut codes = self.codes.write().await;

        match codes.get_mut(&id) {
            Some(code) => {
                code.mark_used(used_at);
                Ok(())
            }
            None => Err(VerificationError::Store {
                message: format!("code not found: {}", id),
            }),
        }
    }

    async fn mark_all_unused_as_used(
        &self,
        subject_id: Uuid,
        purpose: CodePurpose,
        used_at: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        let mut codes = self.codes.write().await;

        for code in codes.values_mut() {
            if code.subject_id == subject_id && code.purpose == purpose && !code.is_used {
                code.mark_used(used_at);
            }
        }

        Ok(())
    }
}
