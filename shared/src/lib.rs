//! Shared utilities and common types for the verification provider
//!
//! This crate provides common functionality used across all workspace crates:
//! - Configuration types and loading
//! - Error response structures
//! - Email address utilities

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, Environment,
    DatabaseConfig, QueueConfig, VerificationConfig, CleanupConfig,
    ServerConfig, LoggingConfig, LogFormat,
};
pub use errors::{ErrorResponse, IntoErrorResponse, ApiResult, error_codes};
pub use utils::email;
