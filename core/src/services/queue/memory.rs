//! In-process queue used by tests and local runs without Redis

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use uuid::Uuid;

use super::traits::{QueueMessage, QueuePublisher, QueueReceiver};

#[derive(Default)]
struct QueueState {
    pending: HashMap<String, VecDeque<QueueMessage>>,
    in_flight: HashMap<String, QueueMessage>,
}

/// FIFO queues kept in memory with peek-lock delivery
#[derive(Clone, Default)]
pub struct InMemoryQueue {
    state: Arc<Mutex<QueueState>>,
    notify: Arc<Notify>,
    fail_publish: Arc<AtomicBool>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following publish fail
    pub fn set_fail_publish(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }

    /// Messages waiting on a queue, oldest first
    pub fn pending(&self, queue: &str) -> Vec<QueueMessage> {
        self.lock()
            .pending
            .get(queue)
            .map(|messages| messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Payloads waiting on a queue, oldest first
    pub fn pending_payloads(&self, queue: &str) -> Vec<String> {
        self.pending(queue)
            .into_iter()
            .map(|m| String::from_utf8_lossy(&m.body).into_owned())
            .collect()
    }

    /// Number of received but unsettled messages
    pub fn in_flight_count(&self) -> usize {
        self.lock().in_flight.len()
    }

    /// Enqueue raw bytes, bypassing the UTF-8 publish path
    pub fn push_raw(&self, queue: &str, body: Vec<u8>) -> String {
        let message = QueueMessage {
            id: Uuid::new_v4().to_string(),
            queue: queue.to_string(),
            body,
            delivery_count: Some(0),
        };
        let id = message.id.clone();

        self.lock()
            .pending
            .entry(queue.to_string())
            .or_default()
            .push_back(message);
        self.notify.notify_waiters();

        id
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // Poisoning only happens if a holder panicked; the state is still usable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn try_take(&self, queue: &str) -> Option<QueueMessage> {
        let mut state = self.lock();
        let mut message = state.pending.get_mut(queue)?.pop_front()?;
        message.delivery_count = Some(message.delivery_count.unwrap_or(0) + 1);
        state.in_flight.insert(message.id.clone(), message.clone());
        Some(message)
    }
}

#[async_trait]
impl QueuePublisher for InMemoryQueue {
    async fn publish(&self, queue: &str, payload: &str) -> Result<String, String> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(format!("queue `{}` rejected the message", queue));
        }
        Ok(self.push_raw(queue, payload.as_bytes().to_vec()))
    }
}

#[async_trait]
impl QueueReceiver for InMemoryQueue {
    async fn receive(&self, queue: &str, timeout: Duration) -> Result<Option<QueueMessage>, String> {
        let deadline = Instant::now() + timeout;

        loop {
            // Register before checking so a publish in between is not missed
            let notified = self.notify.notified();

            if let Some(message) = self.try_take(queue) {
                return Ok(Some(message));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }

            if tokio::time::timeout(deadline - now, notified).await.is_err() {
                return Ok(self.try_take(queue));
            }
        }
    }

    async fn complete(&self, message: &QueueMessage) -> Result<(), String> {
        self.lock()
            .in_flight
            .remove(&message.id)
            .map(|_| ())
            .ok_or_else(|| format!("message {} is not in flight", message.id))
    }

    async fn abandon(&self, message: &QueueMessage) -> Result<(), String> {
        let mut state = self.lock();
        let message = state
            .in_flight
            .remove(&message.id)
            .ok_or_else(|| format!("message {} is not in flight", message.id))?;

        state
            .pending
            .entry(message.queue.clone())
            .or_default()
            .push_front(message);
        drop(state);

        self.notify.notify_waiters();
        Ok(())
    }
}
