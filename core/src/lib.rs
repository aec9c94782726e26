//! # Verification Provider Core
//!
//! Core business logic for issuing and validating email verification codes.
//! This crate contains the domain entities, the error taxonomy, the record store
//! and queue interfaces, and the verification, validation and cleanup services.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    EmailRequest, ValidateRequest, VerificationRecord, VerificationRequest, CODE_LENGTH,
};
pub use errors::{DomainError, DomainResult};
pub use repositories::{
    InMemoryVerificationRecordStore, VerificationRecordStore, VerificationUnitOfWork,
};
pub use services::{
    CleanupService, CleanupServiceConfig, CodeGenerator, FixedCodeGenerator, InMemoryQueue,
    MessageCodec, ProcessOutcome, QueueMessage, QueuePublisher, QueueReceiver,
    RandomCodeGenerator, ValidationService, ValidationServiceConfig, VerificationService,
    VerificationServiceConfig,
};
