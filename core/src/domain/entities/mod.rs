//! Domain entities representing the verification lifecycle.

pub mod email_request;
pub mod verification_record;
pub mod verification_request;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use email_request::EmailRequest;
pub use verification_record::{VerificationRecord, CODE_LENGTH};
pub use verification_request::{ValidateRequest, VerificationRequest};
