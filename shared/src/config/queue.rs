//! Queue transport configuration module

use serde::{Deserialize, Serialize};

/// Redis-backed message queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Redis connection URL
    pub url: String,

    /// Queue carrying inbound verification requests
    #[serde(default = "default_verification_queue")]
    pub verification_queue: String,

    /// Queue receiving outbound email requests
    #[serde(default = "default_email_queue")]
    pub email_queue: String,

    /// How long a single receive call blocks waiting for a message, in seconds
    #[serde(default = "default_receive_timeout")]
    pub receive_timeout_seconds: u64,

    /// Longest a single Redis connection attempt may take, in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Prefix applied to every queue key
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            verification_queue: default_verification_queue(),
            email_queue: default_email_queue(),
            receive_timeout_seconds: default_receive_timeout(),
            connection_timeout: default_connection_timeout(),
            key_prefix: None,
        }
    }
}

impl QueueConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("REDIS_URL").unwrap_or(defaults.url),
            verification_queue: std::env::var("VERIFICATION_QUEUE")
                .unwrap_or(defaults.verification_queue),
            email_queue: std::env::var("EMAIL_QUEUE").unwrap_or(defaults.email_queue),
            receive_timeout_seconds: std::env::var("QUEUE_RECEIVE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.receive_timeout_seconds),
            key_prefix: std::env::var("QUEUE_KEY_PREFIX").ok(),
            ..defaults
        }
    }

    /// Create a new queue configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all queue keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Generate a queue key with prefix
    pub fn make_key(&self, queue: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, queue),
            None => queue.to_string(),
        }
    }
}

fn default_verification_queue() -> String {
    String::from("verification_request")
}

fn default_email_queue() -> String {
    String::from("email_request")
}

fn default_receive_timeout() -> u64 {
    5
}

fn default_connection_timeout() -> u64 {
    5
}
