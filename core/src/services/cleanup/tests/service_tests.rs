use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::VerificationRecord;
use crate::errors::DomainError;
use crate::repositories::InMemoryVerificationRecordStore;
use crate::services::cleanup::{CleanupService, CleanupServiceConfig};

fn record(email: &str, minutes_from_now: i64) -> VerificationRecord {
    VerificationRecord::with_expiry(email, "123456", Utc::now() + Duration::minutes(minutes_from_now))
}

fn create_service(
    records: Vec<VerificationRecord>,
) -> (CleanupService<InMemoryVerificationRecordStore>, InMemoryVerificationRecordStore) {
    let store = InMemoryVerificationRecordStore::with_records(records);
    let service = CleanupService::new(Arc::new(store.clone()), CleanupServiceConfig::default());
    (service, store)
}

#[tokio::test]
async fn test_removes_only_expired_records() {
    let (service, store) = create_service(vec![
        record("expired1@example.com", -5),
        record("expired2@example.com", -1),
        record("live@example.com", 5),
    ]);

    let removed = service.remove_expired_records().await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(store.len().await, 1);
    assert!(store.get("live@example.com").await.is_some());
}

#[tokio::test]
async fn test_nothing_expired_still_commits_once() {
    let (service, store) = create_service(vec![record("live@example.com", 5)]);

    let removed = service.remove_expired_records().await.unwrap();

    assert_eq!(removed, 0);
    assert_eq!(store.len().await, 1);
    assert_eq!(store.commit_count(), 1);
}

#[tokio::test]
async fn test_empty_store() {
    let (service, store) = create_service(Vec::new());

    assert_eq!(service.remove_expired_records().await.unwrap(), 0);
    assert_eq!(store.commit_count(), 1);
}

#[tokio::test]
async fn test_store_failure_is_error() {
    let (service, store) = create_service(vec![record("expired@example.com", -5)]);
    store.set_unavailable(true);

    let err = service.remove_expired_records().await.unwrap_err();
    assert!(matches!(err, DomainError::Persistence { .. }));

    store.set_unavailable(false);
    assert_eq!(service.remove_expired_records().await.unwrap(), 1);
}

#[tokio::test]
async fn test_disabled_background_task_does_not_start() {
    let store = InMemoryVerificationRecordStore::new();
    let service = Arc::new(CleanupService::new(
        Arc::new(store),
        CleanupServiceConfig {
            enabled: false,
            ..Default::default()
        },
    ));

    assert!(service.start_background_task().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_background_task_removes_expired_records() {
    let (service, store) = create_service(vec![
        record("expired@example.com", -5),
        record("live@example.com", 5),
    ]);

    let handle = Arc::new(service).start_background_task().unwrap();

    // The first tick fires immediately
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(store.len().await, 1);
    assert!(store.get("live@example.com").await.is_some());

    handle.abort();
}
