//! Configuration for the verification service

use chrono::Duration;
use vp_shared::config::verification::{DEFAULT_CODE_TTL_MINUTES, MAX_CODE_TTL_MINUTES};
use vp_shared::AppConfig;

use crate::errors::{DomainError, DomainResult};

/// Configuration for the verification service
///
/// The code TTL is only set through [`VerificationServiceConfig::new`], so a
/// config always carries a positive TTL no longer than `MAX_CODE_TTL_MINUTES`.
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Lifetime of an issued code
    code_ttl: Duration,
    /// Queue that receives the outbound email requests
    pub email_queue: String,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl: Duration::minutes(DEFAULT_CODE_TTL_MINUTES),
            email_queue: "email_request".to_string(),
        }
    }
}

impl VerificationServiceConfig {
    /// Create a config, rejecting a TTL outside `1..=MAX_CODE_TTL_MINUTES`
    pub fn new(code_ttl_minutes: i64, email_queue: impl Into<String>) -> DomainResult<Self> {
        if code_ttl_minutes <= 0 {
            return Err(DomainError::configuration(format!(
                "code TTL must be positive, got {} minutes",
                code_ttl_minutes
            )));
        }
        if code_ttl_minutes > MAX_CODE_TTL_MINUTES {
            return Err(DomainError::configuration(format!(
                "code TTL must not exceed {} minutes, got {}",
                MAX_CODE_TTL_MINUTES, code_ttl_minutes
            )));
        }

        Ok(Self {
            code_ttl: Duration::minutes(code_ttl_minutes),
            email_queue: email_queue.into(),
        })
    }

    pub fn from_app_config(config: &AppConfig) -> DomainResult<Self> {
        Self::new(
            config.verification.code_ttl_minutes,
            config.queue.email_queue.clone(),
        )
    }

    pub fn code_ttl(&self) -> Duration {
        self.code_ttl
    }
}
