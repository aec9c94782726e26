//! Queue worker tests over the in-memory store and queue

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use vp_api::worker::{QueueWorker, Settlement, WorkerConfig};
use vp_core::repositories::InMemoryVerificationRecordStore;
use vp_core::services::{
    FixedCodeGenerator, InMemoryQueue, MessageCodec, VerificationService,
    VerificationServiceConfig,
};

const INBOUND: &str = "verification_request";
const OUTBOUND: &str = "email_request";

fn create_worker(
    store: &InMemoryVerificationRecordStore,
    queue: &InMemoryQueue,
) -> QueueWorker<InMemoryVerificationRecordStore, InMemoryQueue, InMemoryQueue> {
    let service = VerificationService::new(
        Arc::new(store.clone()),
        Arc::new(queue.clone()),
        VerificationServiceConfig::default(),
    )
    .with_code_generator(Arc::new(FixedCodeGenerator::new("042817")));

    QueueWorker::new(
        Arc::new(service),
        Arc::new(queue.clone()),
        WorkerConfig {
            queue: INBOUND.to_string(),
            receive_timeout: Duration::from_millis(20),
        },
    )
}

#[tokio::test]
async fn test_valid_message_is_completed_and_email_published() {
    let store = InMemoryVerificationRecordStore::new();
    let queue = InMemoryQueue::new();
    let worker = create_worker(&store, &queue);

    queue.push_raw(INBOUND, br#"{"Email":"user@example.com"}"#.to_vec());

    assert_eq!(worker.run_once().await.unwrap(), Some(Settlement::Completed));
    assert_eq!(queue.in_flight_count(), 0);
    assert!(queue.pending(INBOUND).is_empty());

    let sent = queue.pending(OUTBOUND);
    assert_eq!(sent.len(), 1);
    let email = MessageCodec::decode_email_request(&sent[0].body).unwrap();
    assert_eq!(email.to, "user@example.com");
    assert_eq!(store.get("user@example.com").await.unwrap().code, "042817");
}

#[tokio::test]
async fn test_malformed_message_is_completed_without_side_effects() {
    let store = InMemoryVerificationRecordStore::new();
    let queue = InMemoryQueue::new();
    let worker = create_worker(&store, &queue);

    queue.push_raw(INBOUND, b"not json".to_vec());

    assert_eq!(worker.run_once().await.unwrap(), Some(Settlement::Completed));
    assert!(queue.pending(INBOUND).is_empty());
    assert!(queue.pending(OUTBOUND).is_empty());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_store_failure_abandons_for_redelivery() {
    let store = InMemoryVerificationRecordStore::new();
    let queue = InMemoryQueue::new();
    let worker = create_worker(&store, &queue);

    store.set_unavailable(true);
    queue.push_raw(INBOUND, br#"{"Email":"user@example.com"}"#.to_vec());

    assert_eq!(worker.run_once().await.unwrap(), Some(Settlement::Abandoned));
    assert_eq!(queue.pending(INBOUND).len(), 1);
    assert!(queue.pending(OUTBOUND).is_empty());

    // Redelivery succeeds once the store is back
    store.set_unavailable(false);
    assert_eq!(worker.run_once().await.unwrap(), Some(Settlement::Completed));
    assert_eq!(queue.pending(OUTBOUND).len(), 1);
}

#[tokio::test]
async fn test_empty_queue_times_out() {
    let store = InMemoryVerificationRecordStore::new();
    let queue = InMemoryQueue::new();
    let worker = create_worker(&store, &queue);

    assert_eq!(worker.run_once().await.unwrap(), None);
}

#[tokio::test]
async fn test_run_drains_queue_until_shutdown() {
    let store = InMemoryVerificationRecordStore::new();
    let queue = InMemoryQueue::new();
    let worker = create_worker(&store, &queue);

    for i in 0..3 {
        queue.push_raw(INBOUND, format!(r#"{{"Email":"user{}@example.com"}}"#, i).into_bytes());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(worker.run(shutdown_rx));

    for _ in 0..100 {
        if queue.pending(OUTBOUND).len() == 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("worker should stop after shutdown")
        .unwrap();

    assert_eq!(queue.pending(OUTBOUND).len(), 3);
    assert_eq!(store.len().await, 3);
}
