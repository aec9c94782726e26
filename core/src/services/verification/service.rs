//! Verification service implementation

use std::sync::Arc;
use tracing::{debug, info, warn};
use vp_shared::utils::email::mask_email;

use super::config::VerificationServiceConfig;
use super::types::ProcessOutcome;
use crate::domain::entities::{EmailRequest, VerificationRecord, VerificationRequest};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::VerificationRecordStore;
use crate::services::code_generator::{CodeGenerator, RandomCodeGenerator};
use crate::services::codec::MessageCodec;
use crate::services::queue::QueuePublisher;

/// Issues verification codes and hands the resulting emails to the outbound queue
pub struct VerificationService<R: VerificationRecordStore, P: QueuePublisher> {
    /// Record store
    store: Arc<R>,
    /// Outbound email queue
    publisher: Arc<P>,
    /// Code source
    code_generator: Arc<dyn CodeGenerator>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<R: VerificationRecordStore, P: QueuePublisher> VerificationService<R, P> {
    /// Create a new verification service with random code generation
    ///
    /// # Arguments
    ///
    /// * `store` - Record store implementation
    /// * `publisher` - Publisher for the outbound email queue
    /// * `config` - Service configuration
    pub fn new(store: Arc<R>, publisher: Arc<P>, config: VerificationServiceConfig) -> Self {
        Self {
            store,
            publisher,
            code_generator: Arc::new(RandomCodeGenerator),
            config,
        }
    }

    /// Replace the code generator
    pub fn with_code_generator(mut self, code_generator: Arc<dyn CodeGenerator>) -> Self {
        self.code_generator = code_generator;
        self
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Generate a fresh six-digit code
    pub fn generate_code(&self) -> String {
        self.code_generator.generate()
    }

    /// Parse a raw inbound queue payload
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationRequest)` - Request with a trimmed, non-empty email
    /// * `Err(DomainError::MalformedPayload)` - Payload is not a usable request
    pub fn unpack_verification_request(&self, raw: &[u8]) -> DomainResult<VerificationRequest> {
        MessageCodec::decode_verification_request(raw).map_err(|e| {
            warn!(error = %e, payload_len = raw.len(), "Rejected verification request payload");
            e
        })
    }

    /// Build the email carrying `code` for the requester
    pub fn generate_email_request(
        &self,
        request: Option<&VerificationRequest>,
        code: &str,
    ) -> DomainResult<EmailRequest> {
        let request = request.ok_or_else(|| {
            DomainError::invalid_argument("request", "verification request must be provided")
        })?;

        if code.is_empty() {
            return Err(DomainError::invalid_argument("code", "code must be provided"));
        }

        Ok(EmailRequest::verification_code(&request.email, code))
    }

    /// Persist `code` for the request's email, replacing any previous record
    ///
    /// The write happens in one unit of work. The result is `true` only if
    /// the commit changed at least one row.
    pub async fn save_verification_request(
        &self,
        request: &VerificationRequest,
        code: &str,
    ) -> DomainResult<bool> {
        if !VerificationRecord::is_valid_code_format(code) {
            return Err(DomainError::invalid_argument(
                "code",
                "code must be exactly six ASCII digits",
            ));
        }

        let record = VerificationRecord::new(&request.email, code, self.config.code_ttl())?;
        let expires_at = record.expires_at;

        let mut unit = self.store.begin().await?;
        unit.add(record).await?;
        let affected = unit.commit().await?;

        debug!(
            email = %mask_email(&request.email),
            %expires_at,
            affected,
            "Verification record saved"
        );

        Ok(affected > 0)
    }

    /// Serialize an email request for the outbound queue
    pub fn generate_queue_email_request(&self, email: &EmailRequest) -> DomainResult<String> {
        MessageCodec::encode_email_request(email)
    }

    /// Handle one inbound queue payload end to end
    ///
    /// Unpack, generate a code, build the email, save the record, then publish
    /// the email only if the save changed the store. A publish failure leaves
    /// the saved record in place; redelivery issues a new code that replaces it.
    pub async fn process_message(&self, raw: &[u8]) -> DomainResult<ProcessOutcome> {
        let request = self.unpack_verification_request(raw)?;
        let code = self.generate_code();
        let email = self.generate_email_request(Some(&request), &code)?;

        if !self.save_verification_request(&request, &code).await? {
            warn!(
                email = %mask_email(&request.email),
                "Verification record was not saved, email not published"
            );
            return Ok(ProcessOutcome::NotSaved {
                email: request.email,
            });
        }

        let payload = self.generate_queue_email_request(&email)?;
        let message_id = self
            .publisher
            .publish(&self.config.email_queue, &payload)
            .await
            .map_err(DomainError::publish)?;

        info!(
            email = %mask_email(&request.email),
            queue = %self.config.email_queue,
            %message_id,
            "Verification email published"
        );

        Ok(ProcessOutcome::Dispatched {
            email: request.email,
            message_id,
        })
    }
}
