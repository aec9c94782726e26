//! Core domain errors
//!
//! Every failure in the verification lifecycle is one of these kinds. Parsing
//! and input errors are contract violations and are never retried; persistence
//! and publish errors are left to the caller's redelivery policy.

use thiserror::Error;
use vp_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

#[derive(Error, Debug)]
pub enum DomainError {
    /// Queue payload could not be parsed or lacks a required field
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    /// A required input was absent or unusable
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// The record store failed
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// The outbound queue rejected a message
    #[error("Publish error: {message}")]
    Publish { message: String },

    /// Configuration cannot be used by a service
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn malformed(message: impl Into<String>) -> Self {
        DomainError::MalformedPayload {
            message: message.into(),
        }
    }

    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        DomainError::Persistence {
            message: message.into(),
        }
    }

    pub fn publish(message: impl Into<String>) -> Self {
        DomainError::Publish {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        DomainError::Configuration {
            message: message.into(),
        }
    }

    /// Stable error code for callers and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::MalformedPayload { .. } => error_codes::MALFORMED_PAYLOAD,
            DomainError::InvalidArgument { .. } => error_codes::INVALID_ARGUMENT,
            DomainError::Persistence { .. } => error_codes::DATABASE_ERROR,
            DomainError::Publish { .. } => error_codes::QUEUE_ERROR,
            DomainError::Configuration { .. } => error_codes::CONFIGURATION_ERROR,
        }
    }

    /// Whether redelivering the same input could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DomainError::Persistence { .. } | DomainError::Publish { .. }
        )
    }
}

impl IntoErrorResponse for DomainError {
    /// Internal details stay in the logs; callers only get a generic message
    /// for infrastructure failures.
    fn to_error_response(&self) -> ErrorResponse {
        let message = match self {
            DomainError::MalformedPayload { .. } | DomainError::InvalidArgument { .. } => {
                self.to_string()
            }
            _ => "The request could not be processed".to_string(),
        };
        ErrorResponse::new(self.error_code(), message)
    }
}
