use std::time::Duration;

use crate::services::queue::{InMemoryQueue, QueuePublisher, QueueReceiver};

#[tokio::test]
async fn test_receive_in_publish_order() {
    let queue = InMemoryQueue::new();
    queue.publish("q", "first").await.unwrap();
    queue.publish("q", "second").await.unwrap();

    let first = queue.receive("q", Duration::from_millis(10)).await.unwrap().unwrap();
    let second = queue.receive("q", Duration::from_millis(10)).await.unwrap().unwrap();

    assert_eq!(first.body, b"first");
    assert_eq!(second.body, b"second");
    assert_eq!(first.queue, "q");
    assert_eq!(first.delivery_count, Some(1));
}

#[tokio::test]
async fn test_receive_times_out_on_empty_queue() {
    let queue = InMemoryQueue::new();
    let received = queue.receive("q", Duration::from_millis(20)).await.unwrap();
    assert!(received.is_none());
}

#[tokio::test]
async fn test_queues_are_independent() {
    let queue = InMemoryQueue::new();
    queue.publish("a", "payload").await.unwrap();

    assert!(queue.receive("b", Duration::from_millis(10)).await.unwrap().is_none());
    assert_eq!(queue.pending_payloads("a"), vec!["payload".to_string()]);
}

#[tokio::test]
async fn test_complete_removes_message() {
    let queue = InMemoryQueue::new();
    queue.publish("q", "payload").await.unwrap();

    let message = queue.receive("q", Duration::from_millis(10)).await.unwrap().unwrap();
    assert_eq!(queue.in_flight_count(), 1);

    queue.complete(&message).await.unwrap();
    assert_eq!(queue.in_flight_count(), 0);
    assert!(queue.pending("q").is_empty());

    // Settling twice is an error
    assert!(queue.complete(&message).await.is_err());
}

#[tokio::test]
async fn test_abandon_redelivers_at_front() {
    let queue = InMemoryQueue::new();
    queue.publish("q", "first").await.unwrap();
    queue.publish("q", "second").await.unwrap();

    let message = queue.receive("q", Duration::from_millis(10)).await.unwrap().unwrap();
    queue.abandon(&message).await.unwrap();

    let again = queue.receive("q", Duration::from_millis(10)).await.unwrap().unwrap();
    assert_eq!(again.id, message.id);
    assert_eq!(again.body, b"first");
    assert_eq!(again.delivery_count, Some(2));
}

#[tokio::test]
async fn test_waiting_receiver_wakes_on_publish() {
    let queue = InMemoryQueue::new();
    let receiver = queue.clone();

    let handle = tokio::spawn(async move {
        receiver.receive("q", Duration::from_secs(5)).await
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    queue.publish("q", "late").await.unwrap();

    let message = handle.await.unwrap().unwrap().unwrap();
    assert_eq!(message.body, b"late");
}

#[tokio::test]
async fn test_failing_publish() {
    let queue = InMemoryQueue::new();
    queue.set_fail_publish(true);

    assert!(queue.publish("q", "payload").await.is_err());
    assert!(queue.pending("q").is_empty());

    queue.set_fail_publish(false);
    assert!(queue.publish("q", "payload").await.is_ok());
}
