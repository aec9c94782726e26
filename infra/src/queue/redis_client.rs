//! Redis client with connection retry logic
//!
//! Wraps one multiplexed connection. Operations that fail with a transient
//! error are retried with exponential backoff.

use redis::{aio::MultiplexedConnection, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::InfrastructureError;

/// Connect timeout used by [`RedisClient::new`]
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Boxed future returned by operations passed to [`RedisClient::execute_with_retry`]
pub type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client with retry logic
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Maximum number of attempts per operation
    max_retries: u32,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect with the default retry configuration
    pub async fn new(url: &str) -> Result<Self, InfrastructureError> {
        Self::with_connect_timeout(url, DEFAULT_CONNECT_TIMEOUT).await
    }

    /// Connect with the default retries, bounding each attempt by `connect_timeout`
    pub async fn with_connect_timeout(
        url: &str,
        connect_timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        Self::new_with_retry_config(url, 3, 100, connect_timeout).await
    }

    /// Connect with a custom retry configuration
    ///
    /// # Arguments
    /// * `url` - Redis connection URL
    /// * `max_retries` - Maximum number of attempts
    /// * `retry_delay_ms` - Base delay between attempts in milliseconds
    /// * `connect_timeout` - Longest a single connection attempt may take
    pub async fn new_with_retry_config(
        url: &str,
        max_retries: u32,
        retry_delay_ms: u64,
        connect_timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(url), "Creating Redis client");

        let client = Client::open(url).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(
            client,
            max_retries,
            retry_delay_ms,
            connect_timeout,
        )
        .await?;

        Ok(Self {
            connection,
            max_retries,
            retry_delay_ms,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
        connect_timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Connecting to Redis");

            let attempt = timeout(connect_timeout, client.get_multiplexed_async_connection())
                .await
                .unwrap_or_else(|_| {
                    Err(RedisError::from(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("connect timed out after {:?}", connect_timeout),
                    )))
                });

            match attempt {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff with cap at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Failed to connect to Redis");
                    return Err(InfrastructureError::Queue(e));
                }
            }
        }
    }

    /// A handle on the underlying connection, for calls that must not be retried
    pub fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    /// Run an operation, retrying transient failures
    pub async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Redis operation failed");
                    return Err(e);
                }
            }
        }
    }

    /// PING the server
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        Ok(response == "PONG")
    }
}

/// Whether an error is transient and the operation may be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
