//! Unit tests for the in-memory code repository

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::purpose::CodePurpose;
use crate::domain::entities::verification_code::VerificationCode;
use crate::repositories::code::memory::InMemoryCodeRepository;
use crate::repositories::code::r#trait::CodeRepository;

fn code_for(subject_id: Uuid, purpose: CodePurpose) -> VerificationCode {
    VerificationCode::new(
        subject_id,
        purpose,
        "d".repeat(64),
        "a".repeat(32),
        15,
    )
}

#[tokio::test]
async fn test_insert_and_fetch_most_recent() {
    let repo = InMemoryCodeRepository::new();
    let subject_id = Uuid::new_v4();

    let code = code_for(subject_id, CodePurpose::Registration);
    let saved = repo.insert(code.clone()).await.unwrap();
    assert_eq!(saved.id, code.id);

    let found = repo
        .most_recent_active(subject_id, CodePurpose::Registration, Utc::now())
        .await
        .unwrap();
    assert_eq!(found.map(|c| c.id), Some(code.id));
}

#[tokio::test]
async fn test_insert_rejects_duplicate_id() {
    let repo = InMemoryCodeRepository::new();
    let code = code_for(Uuid::new_v4(), CodePurpose::Login);

    repo.insert(code.clone()).await.unwrap();
    assert!(repo.insert(code).await.is_err());
}

#[tokio::test]
async fn test_most_recent_active_prefers_newest() {
    let repo = InMemoryCodeRepository::new();
    let subject_id = Uuid::new_v4();

    let mut older = code_for(subject_id, CodePurpose::Registration);
    older.created_at = older.created_at - Duration::minutes(2);
    let newer = code_for(subject_id, CodePurpose::Registration);

    repo.insert(older).await.unwrap();
    repo.insert(newer.clone()).await.unwrap();

    let found = repo
        .most_recent_active(subject_id, CodePurpose::Registration, Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, newer.id);
}

#[tokio::test]
async fn test_most_recent_active_skips_used_and_expired() {
    let repo = InMemoryCodeRepository::new();
    let subject_id = Uuid::new_v4();
    let now = Utc::now();

    let mut used = code_for(subject_id, CodePurpose::Registration);
    used.mark_used(now);
    let mut expired = code_for(subject_id, CodePurpose::Registration);
    expired.expires_at = now - Duration::seconds(1);

    repo.insert(used).await.unwrap();
    repo.insert(expired).await.unwrap();

    let found = repo
        .most_recent_active(subject_id, CodePurpose::Registration, now)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_most_recent_active_is_purpose_scoped() {
    let repo = InMemoryCodeRepository::new();
    let subject_id = Uuid::new_v4();

    repo.insert(code_for(subject_id, CodePurpose::Registration))
        .await
        .unwrap();

    let found = repo
        .most_recent_active(subject_id, CodePurpose::Login, Utc::now())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_count_and_list_issued_since() {
    let repo = InMemoryCodeRepository::new();
    let subject_id = Uuid::new_v4();
    let window_start = Utc::now() - Duration::minutes(60);

    let mut outside = code_for(subject_id, CodePurpose::Registration);
    outside.created_at = window_start - Duration::minutes(5);
    repo.insert(outside).await.unwrap();

    let first = code_for(subject_id, CodePurpose::Registration);
    let second = code_for(subject_id, CodePurpose::Registration);
    repo.insert(first.clone()).await.unwrap();
    repo.insert(second).await.unwrap();

    let count = repo
        .count_issued_since(subject_id, CodePurpose::Registration, window_start)
        .await
        .unwrap();
    assert_eq!(count, 2);

    let listed = repo
        .list_issued_since(subject_id, CodePurpose::Registration, window_start)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    // Oldest first
    assert!(listed[0].created_at <= listed[1].created_at);
}

#[tokio::test]
async fn test_increment_attempts_persists() {
    let repo = InMemoryCodeRepository::new();
    let code = code_for(Uuid::new_v4(), CodePurpose::PasswordReset);
    let id = code.id;
    repo.insert(code).await.unwrap();

    repo.increment_attempts(id).await.unwrap();
    repo.increment_attempts(id).await.unwrap();

    assert_eq!(repo.get(id).await.unwrap().attempts, 2);
}

#[tokio::test]
async fn test_increment_attempts_missing_row_is_error() {
    let repo = InMemoryCodeRepository::new();
    assert!(repo.increment_attempts(Uuid::new_v4()).await.is_err());
}

#[tokio::test]
async fn test_mark_all_unused_as_used_scopes_to_pair() {
    let repo = InMemoryCodeRepository::new();
    let subject_id = Uuid::new_v4();
    let now = Utc::now();

    let a = code_for(subject_id, CodePurpose::Registration);
    let b = code_for(subject_id, CodePurpose::Registration);
    let other_purpose = code_for(subject_id, CodePurpose::Login);
    let other_subject = code_for(Uuid::new_v4(), CodePurpose::Registration);

    for code in [&a, &b, &other_purpose, &other_subject] {
        repo.insert(code.clone()).await.unwrap();
    }

    repo.mark_all_unused_as_used(subject_id, CodePurpose::Registration, now)
        .await
        .unwrap();

    assert!(repo.get(a.id).await.unwrap().is_used);
    assert!(repo.get(b.id).await.unwrap().is_used);
    assert!(!repo.get(other_purpose.id).await.unwrap().is_used);
    assert!(!repo.get(other_subject.id).await.unwrap().is_used);
}
