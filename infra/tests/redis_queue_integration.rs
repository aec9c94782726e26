//! Integration tests for the Redis queue transport
//!
//! These tests require a running Redis instance (6.2 or later).
//! Run with: cargo test -p vp_infra --test redis_queue_integration -- --ignored

use std::time::Duration;

use vp_core::services::queue::{QueuePublisher, QueueReceiver};
use vp_infra::RedisQueue;
use vp_shared::QueueConfig;

async fn connect(prefix: &str) -> RedisQueue {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let config = QueueConfig::new(url).with_prefix(format!("test:{}:{}", prefix, uuid::Uuid::new_v4()));
    RedisQueue::connect(config).await.expect("Failed to connect to Redis")
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_publish_receive_complete() {
    let queue = connect("complete").await;
    assert!(queue.health_check().await.unwrap());

    queue.publish("q", r#"{"Email":"a@example.com"}"#).await.unwrap();
    queue.publish("q", r#"{"Email":"b@example.com"}"#).await.unwrap();

    let first = queue.receive("q", Duration::from_secs(1)).await.unwrap().unwrap();
    assert_eq!(first.body, br#"{"Email":"a@example.com"}"#.to_vec());
    assert_eq!(queue.len("q").await.unwrap(), 1);

    queue.complete(&first).await.unwrap();

    let second = queue.receive("q", Duration::from_secs(1)).await.unwrap().unwrap();
    assert_eq!(second.body, br#"{"Email":"b@example.com"}"#.to_vec());
    queue.complete(&second).await.unwrap();

    assert!(queue.receive("q", Duration::from_millis(100)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_abandon_redelivers() {
    let queue = connect("abandon").await;

    queue.publish("q", "payload").await.unwrap();
    let message = queue.receive("q", Duration::from_secs(1)).await.unwrap().unwrap();
    queue.abandon(&message).await.unwrap();

    let again = queue.receive("q", Duration::from_secs(1)).await.unwrap().unwrap();
    assert_eq!(again.body, b"payload".to_vec());
    // Redelivery is not counted on lists
    assert_eq!(message.delivery_count, None);
    assert_eq!(again.delivery_count, None);
    queue.complete(&again).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_recover_in_flight() {
    let queue = connect("recover").await;

    queue.publish("q", "payload").await.unwrap();
    let _unsettled = queue.receive("q", Duration::from_secs(1)).await.unwrap().unwrap();
    assert_eq!(queue.len("q").await.unwrap(), 0);

    assert_eq!(queue.recover_in_flight("q").await.unwrap(), 1);
    assert_eq!(queue.len("q").await.unwrap(), 1);
}
