use actix_web::{web, HttpResponse};
use validator::Validate;
use vp_core::domain::entities::ValidateRequest;
use vp_core::repositories::VerificationRecordStore;

use crate::app::AppState;
use crate::dto::{ValidateCodeRequest, ValidateCodeResponse};
use crate::handlers::{handle_domain_error, validation_error_response};

/// Handler for POST /api/verification/validate
///
/// # Request Body
///
/// ```json
/// { "Email": "user@example.com", "Code": "042817" }
/// ```
///
/// # Responses
///
/// * `200 {"valid": true}` - Code matches and has not expired
/// * `400 {"valid": false}` - Unknown email, wrong code or expired code
/// * `422` - Body failed field validation
/// * `500` - Record store failure
pub async fn validate_code<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<ValidateCodeRequest>,
) -> HttpResponse
where
    R: VerificationRecordStore + 'static,
{
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let request: ValidateRequest = request.into();
    match state.validation_service.validate_code(&request).await {
        Ok(true) => HttpResponse::Ok().json(ValidateCodeResponse { valid: true }),
        Ok(false) => HttpResponse::BadRequest().json(ValidateCodeResponse { valid: false }),
        Err(e) => handle_domain_error(e),
    }
}
