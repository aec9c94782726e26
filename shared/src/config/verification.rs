//! Verification lifecycle configuration: code TTL and expiry cleanup cadence

use serde::{Deserialize, Serialize};

/// Default lifetime of an issued verification code
pub const DEFAULT_CODE_TTL_MINUTES: i64 = 10;

/// Longest lifetime an issued code may be given (one day)
pub const MAX_CODE_TTL_MINUTES: i64 = 24 * 60;

/// Default interval between expiry cleanup runs
pub const DEFAULT_CLEANUP_INTERVAL_SECONDS: u64 = 60;

/// Settings for issuing and validating verification codes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Minutes before an issued code expires
    #[serde(default = "default_code_ttl_minutes")]
    pub code_ttl_minutes: i64,

    /// Remove the record once a code has been validated successfully
    #[serde(default)]
    pub consume_on_success: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: default_code_ttl_minutes(),
            consume_on_success: false,
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            code_ttl_minutes: std::env::var("CODE_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CODE_TTL_MINUTES),
            consume_on_success: std::env::var("CONSUME_CODE_ON_SUCCESS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// Settings for the background expiry cleanup
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// Whether the background cleanup task runs at all
    #[serde(default = "default_cleanup_enabled")]
    pub enabled: bool,

    /// Seconds between cleanup runs
    #[serde(default = "default_cleanup_interval")]
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: default_cleanup_enabled(),
            interval_seconds: default_cleanup_interval(),
        }
    }
}

impl CleanupConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("CLEANUP_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            interval_seconds: std::env::var("CLEANUP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CLEANUP_INTERVAL_SECONDS),
        }
    }
}

fn default_code_ttl_minutes() -> i64 {
    DEFAULT_CODE_TTL_MINUTES
}

fn default_cleanup_enabled() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    DEFAULT_CLEANUP_INTERVAL_SECONDS
}
