//! Redis list queue with peek-lock delivery
//!
//! Producers `LPUSH` onto the queue list. A receive `BLMOVE`s the oldest
//! element into `<queue>:processing`; completing removes it from there and
//! abandoning moves it back to the consumer end of the queue. Lists carry no
//! delivery metadata, so received messages have no delivery count.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vp_core::services::queue::{QueueMessage, QueuePublisher, QueueReceiver};
use vp_shared::QueueConfig;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Smallest blocking timeout sent to Redis; zero would block forever
const MIN_BLOCK_SECONDS: f64 = 0.01;

/// Queue transport over Redis lists
#[derive(Clone)]
pub struct RedisQueue {
    /// Connection for publish and settle commands
    client: RedisClient,
    /// Separate connection for blocking receives
    blocking_client: RedisClient,
    config: QueueConfig,
}

impl RedisQueue {
    /// Connect both the command and the blocking connection
    pub async fn connect(config: QueueConfig) -> Result<Self, InfrastructureError> {
        let connect_timeout = Duration::from_secs(config.connection_timeout);
        let client = RedisClient::with_connect_timeout(&config.url, connect_timeout).await?;
        let blocking_client =
            RedisClient::with_connect_timeout(&config.url, connect_timeout).await?;

        Ok(Self {
            client,
            blocking_client,
            config,
        })
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Redis key of a logical queue
    pub fn queue_key(&self, queue: &str) -> String {
        self.config.make_key(queue)
    }

    /// Redis key of a queue's processing list
    pub fn processing_key(&self, queue: &str) -> String {
        self.config.make_key(&format!("{}:processing", queue))
    }

    /// Move every message left in the processing list back onto the queue
    ///
    /// Messages end up there when a receiver dies before settling them. Only
    /// call this while no receiver is running on `queue`.
    pub async fn recover_in_flight(&self, queue: &str) -> Result<usize, InfrastructureError> {
        let queue_key = self.queue_key(queue);
        let processing_key = self.processing_key(queue);
        let mut conn = self.client.connection();
        let mut recovered = 0;

        loop {
            let moved: Option<Vec<u8>> = redis::cmd("LMOVE")
                .arg(&processing_key)
                .arg(&queue_key)
                .arg("RIGHT")
                .arg("RIGHT")
                .query_async(&mut conn)
                .await?;

            if moved.is_none() {
                break;
            }
            recovered += 1;
        }

        if recovered > 0 {
            info!(queue, recovered, "Recovered unsettled queue messages");
        }
        Ok(recovered)
    }

    /// Number of messages waiting on a queue
    pub async fn len(&self, queue: &str) -> Result<usize, InfrastructureError> {
        let key = self.queue_key(queue);
        let len = self
            .client
            .execute_with_retry(move |mut conn| {
                let key = key.clone();
                Box::pin(async move { redis::cmd("LLEN").arg(key).query_async::<_, usize>(&mut conn).await })
            })
            .await?;
        Ok(len)
    }

    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        self.client.health_check().await
    }
}

#[async_trait]
impl QueuePublisher for RedisQueue {
    async fn publish(&self, queue: &str, payload: &str) -> Result<String, String> {
        let key = self.queue_key(queue);
        let payload = payload.to_string();

        self.client
            .execute_with_retry(move |mut conn| {
                let key = key.clone();
                let payload = payload.clone();
                Box::pin(async move {
                    redis::cmd("LPUSH")
                        .arg(key)
                        .arg(payload)
                        .query_async::<_, i64>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| format!("Failed to publish to `{}`: {}", queue, e))?;

        // Redis lists carry no ids; this one only correlates log lines
        let id = Uuid::new_v4().to_string();
        debug!(queue, message_id = %id, "Published queue message");
        Ok(id)
    }
}

#[async_trait]
impl QueueReceiver for RedisQueue {
    async fn receive(&self, queue: &str, timeout: Duration) -> Result<Option<QueueMessage>, String> {
        let mut conn = self.blocking_client.connection();
        let seconds = timeout.as_secs_f64().max(MIN_BLOCK_SECONDS);

        let body: Option<Vec<u8>> = redis::cmd("BLMOVE")
            .arg(self.queue_key(queue))
            .arg(self.processing_key(queue))
            .arg("RIGHT")
            .arg("LEFT")
            .arg(seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| format!("Failed to receive from `{}`: {}", queue, e))?;

        Ok(body.map(|body| QueueMessage {
            id: Uuid::new_v4().to_string(),
            queue: queue.to_string(),
            body,
            // Lists keep no per-element metadata
            delivery_count: None,
        }))
    }

    async fn complete(&self, message: &QueueMessage) -> Result<(), String> {
        let mut conn = self.client.connection();

        let removed: i64 = redis::cmd("LREM")
            .arg(self.processing_key(&message.queue))
            .arg(1)
            .arg(&message.body)
            .query_async(&mut conn)
            .await
            .map_err(|e| format!("Failed to complete message {}: {}", message.id, e))?;

        if removed == 0 {
            warn!(message_id = %message.id, queue = %message.queue, "Completed message was not in the processing list");
        }
        Ok(())
    }

    async fn abandon(&self, message: &QueueMessage) -> Result<(), String> {
        let mut conn = self.client.connection();

        redis::pipe()
            .atomic()
            .cmd("LREM")
            .arg(self.processing_key(&message.queue))
            .arg(1)
            .arg(&message.body)
            .ignore()
            .cmd("RPUSH")
            .arg(self.queue_key(&message.queue))
            .arg(&message.body)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| format!("Failed to abandon message {}: {}", message.id, e))?;

        debug!(message_id = %message.id, queue = %message.queue, "Abandoned queue message");
        Ok(())
    }
}
