//! Verification service for email-based verification codes
//!
//! Consumes verification requests from the inbound queue, persists a fresh
//! code per email address and publishes the email that carries it.

mod config;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use types::ProcessOutcome;
