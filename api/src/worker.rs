//! Queue worker driving the verification service
//!
//! Messages are settled after processing: contract violations are completed
//! since redelivery cannot fix them, transient failures are abandoned so the
//! transport redelivers them.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use vp_core::repositories::VerificationRecordStore;
use vp_core::services::queue::{QueueMessage, QueuePublisher, QueueReceiver};
use vp_core::services::VerificationService;
use vp_shared::QueueConfig;

/// Pause after a failed receive before polling again
const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Queue carrying inbound verification requests
    pub queue: String,
    /// Longest a single receive call waits
    pub receive_timeout: Duration,
}

impl From<&QueueConfig> for WorkerConfig {
    fn from(config: &QueueConfig) -> Self {
        Self {
            queue: config.verification_queue.clone(),
            receive_timeout: Duration::from_secs(config.receive_timeout_seconds),
        }
    }
}

/// How a processed message was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Completed,
    Abandoned,
}

pub struct QueueWorker<R, P, Q>
where
    R: VerificationRecordStore,
    P: QueuePublisher,
    Q: QueueReceiver,
{
    service: Arc<VerificationService<R, P>>,
    receiver: Arc<Q>,
    config: WorkerConfig,
}

impl<R, P, Q> QueueWorker<R, P, Q>
where
    R: VerificationRecordStore + 'static,
    P: QueuePublisher + 'static,
    Q: QueueReceiver + 'static,
{
    pub fn new(service: Arc<VerificationService<R, P>>, receiver: Arc<Q>, config: WorkerConfig) -> Self {
        Self {
            service,
            receiver,
            config,
        }
    }

    /// Process one message and settle it
    pub async fn handle_message(&self, message: &QueueMessage) -> Settlement {
        let settlement = match self.service.process_message(&message.body).await {
            Ok(outcome) => {
                debug!(message_id = %message.id, dispatched = outcome.is_dispatched(), "Message processed");
                Settlement::Completed
            }
            Err(e) if e.is_transient() => {
                warn!(
                    message_id = %message.id,
                    delivery_count = ?message.delivery_count,
                    code = e.error_code(),
                    error = %e,
                    "Message processing failed, abandoning for redelivery"
                );
                Settlement::Abandoned
            }
            Err(e) => {
                warn!(
                    message_id = %message.id,
                    code = e.error_code(),
                    error = %e,
                    "Discarding message that cannot be processed"
                );
                Settlement::Completed
            }
        };

        let result = match settlement {
            Settlement::Completed => self.receiver.complete(message).await,
            Settlement::Abandoned => self.receiver.abandon(message).await,
        };
        if let Err(e) = result {
            error!(message_id = %message.id, ?settlement, error = %e, "Failed to settle message");
        }

        settlement
    }

    /// Wait for one message and handle it
    ///
    /// # Returns
    /// * `Ok(Some(Settlement))` - A message was handled
    /// * `Ok(None)` - Receive timed out
    /// * `Err(String)` - Receive failed
    pub async fn run_once(&self) -> Result<Option<Settlement>, String> {
        let message = self
            .receiver
            .receive(&self.config.queue, self.config.receive_timeout)
            .await?;

        match message {
            Some(message) => Ok(Some(self.handle_message(&message).await)),
            None => Ok(None),
        }
    }

    /// Consume messages until `shutdown` turns true
    ///
    /// A message already received is finished before the loop exits.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(queue = %self.config.queue, "Queue worker started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            // Only the wait is cancelled on shutdown, never the processing
            let received = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                received = self.receiver.receive(&self.config.queue, self.config.receive_timeout) => received,
            };

            match received {
                Ok(Some(message)) => {
                    self.handle_message(&message).await;
                }
                Ok(None) => {}
                Err(e) => {
                    error!(queue = %self.config.queue, error = %e, "Failed to receive message");
                    tokio::time::sleep(RECEIVE_ERROR_BACKOFF).await;
                }
            }
        }

        info!(queue = %self.config.queue, "Queue worker stopped");
    }
}
