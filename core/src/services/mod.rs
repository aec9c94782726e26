//! Business services implementing the verification lifecycle.

pub mod cleanup;
pub mod code_generator;
pub mod codec;
pub mod queue;
pub mod validation;
pub mod verification;

// Re-export commonly used types
pub use cleanup::{CleanupService, CleanupServiceConfig};
pub use code_generator::{CodeGenerator, FixedCodeGenerator, RandomCodeGenerator};
pub use codec::MessageCodec;
pub use queue::{InMemoryQueue, QueueMessage, QueuePublisher, QueueReceiver};
pub use validation::{ValidationService, ValidationServiceConfig};
pub use verification::{ProcessOutcome, VerificationService, VerificationServiceConfig};
