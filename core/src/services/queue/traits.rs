use async_trait::async_trait;
use std::time::Duration;

/// A message taken from a queue but not yet settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Transport-assigned identifier, used for logging
    pub id: String,
    /// Queue the message was received from
    pub queue: String,
    /// Raw payload bytes
    pub body: Vec<u8>,
    /// How many times this message has been handed to a receiver, when the
    /// transport tracks it
    pub delivery_count: Option<u32>,
}

/// Sends payloads to a named queue
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Publish a UTF-8 payload
    ///
    /// # Returns
    /// * `Ok(String)` - Message id assigned by the transport
    /// * `Err(String)` - Publish failed, the message was not enqueued
    async fn publish(&self, queue: &str, payload: &str) -> Result<String, String>;
}

/// Receives messages with peek-lock semantics
///
/// A received message stays invisible to other receivers until it is
/// completed (removed for good) or abandoned (made available again).
#[async_trait]
pub trait QueueReceiver: Send + Sync {
    /// Wait up to `timeout` for the next message
    async fn receive(&self, queue: &str, timeout: Duration) -> Result<Option<QueueMessage>, String>;

    /// Settle a message as processed
    async fn complete(&self, message: &QueueMessage) -> Result<(), String>;

    /// Release a message for redelivery
    async fn abandon(&self, message: &QueueMessage) -> Result<(), String>;
}
