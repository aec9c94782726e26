use serde::{Deserialize, Serialize};
use validator::Validate;
use vp_core::domain::entities::ValidateRequest;

/// Body of `POST /api/verification/validate`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ValidateCodeRequest {
    /// Address the code was sent to
    #[serde(rename = "Email", alias = "email")]
    #[validate(length(min = 1, max = 320))]
    pub email: String,

    /// Code as typed by the user
    #[serde(rename = "Code", alias = "code")]
    #[validate(length(min = 1, max = 32))]
    pub code: String,
}

impl From<ValidateCodeRequest> for ValidateRequest {
    fn from(request: ValidateCodeRequest) -> Self {
        ValidateRequest::new(request.email, request.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateCodeResponse {
    pub valid: bool,
}
