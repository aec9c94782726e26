//! Inbound request types: the queued verification request and the validation input.

use serde::{Deserialize, Serialize};

/// Request to issue a verification code, carried on the inbound queue
///
/// Wire format: `{"Email": "user@example.com"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    #[serde(rename = "Email", alias = "email")]
    pub email: String,
}

impl VerificationRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

/// Email and code pair submitted for validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateRequest {
    #[serde(rename = "Email", alias = "email")]
    pub email: String,

    #[serde(rename = "Code", alias = "code")]
    pub code: String,
}

impl ValidateRequest {
    pub fn new(email: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            code: code.into(),
        }
    }
}
