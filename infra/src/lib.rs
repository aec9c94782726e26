//! # Infrastructure Layer
//!
//! Concrete implementations of the core's storage and transport seams:
//! - **Database**: MySQL verification record store using SQLx transactions
//! - **Queue**: Redis lists with a processing list for peek-lock delivery

use vp_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Queue module - Redis-backed queue transport
pub mod queue;

pub use database::{DatabasePool, MySqlVerificationRecordStore, PoolStatistics};
pub use queue::{RedisClient, RedisQueue};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis queue error
    #[error("Queue error: {0}")]
    Queue(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Database(e) => DomainError::persistence(e.to_string()),
            InfrastructureError::Migration(e) => DomainError::persistence(e.to_string()),
            InfrastructureError::Queue(e) => DomainError::publish(e.to_string()),
            InfrastructureError::Config(message) => DomainError::Configuration { message },
        }
    }
}
