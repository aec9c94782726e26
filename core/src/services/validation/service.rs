use chrono::Utc;
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use tracing::{debug, info};
use vp_shared::utils::email::mask_email;
use vp_shared::VerificationConfig;

use crate::domain::entities::ValidateRequest;
use crate::errors::DomainResult;
use crate::repositories::VerificationRecordStore;

/// Configuration for the validation service
#[derive(Debug, Clone, Default)]
pub struct ValidationServiceConfig {
    /// Remove the record after a successful validation
    pub consume_on_success: bool,
}

impl From<&VerificationConfig> for ValidationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            consume_on_success: config.consume_on_success,
        }
    }
}

/// Checks submitted codes against stored records
pub struct ValidationService<R: VerificationRecordStore> {
    store: Arc<R>,
    config: ValidationServiceConfig,
}

impl<R: VerificationRecordStore> ValidationService<R> {
    pub fn new(store: Arc<R>, config: ValidationServiceConfig) -> Self {
        Self { store, config }
    }

    /// Check whether `request.code` is the current, unexpired code for `request.email`
    ///
    /// A missing record, a different code and an expired record all yield
    /// `Ok(false)`. Only store failures are errors.
    pub async fn validate_code(&self, request: &ValidateRequest) -> DomainResult<bool> {
        let email = request.email.trim();
        if email.is_empty() || request.code.is_empty() {
            debug!("Validation request without email or code");
            return Ok(false);
        }

        let mut unit = self.store.begin().await?;
        let record = unit.find_by_email(email).await?;
        let now = Utc::now();

        let valid = match &record {
            Some(record) => {
                codes_match(&record.code, &request.code) && !record.is_expired_at(now)
            }
            None => false,
        };

        if valid && self.config.consume_on_success {
            if let Some(record) = record {
                unit.remove_range(std::slice::from_ref(&record)).await?;
            }
        }

        unit.commit().await?;

        info!(email = %mask_email(email), valid, "Verification code validated");
        Ok(valid)
    }
}

fn codes_match(stored: &str, submitted: &str) -> bool {
    stored.len() == submitted.len() && constant_time_eq(stored.as_bytes(), submitted.as_bytes())
}
