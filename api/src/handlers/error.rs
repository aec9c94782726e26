//! Conversion of failures into HTTP responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use validator::ValidationErrors;
use vp_core::errors::DomainError;
use vp_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::MalformedPayload { .. } | DomainError::InvalidArgument { .. } => {
            StatusCode::BAD_REQUEST
        }
        DomainError::Publish { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Persistence { .. } | DomainError::Configuration { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, code = error.error_code(), "Request failed");
    } else {
        tracing::warn!(error = %error, code = error.error_code(), "Request rejected");
    }

    HttpResponse::build(status).json(error.to_error_response())
}

/// 422 response listing the fields that failed validation
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed");
    for (field, field_errors) in errors.field_errors() {
        let codes: Vec<String> = field_errors.iter().map(|e| e.code.to_string()).collect();
        response = response.add_detail(field, codes);
    }

    HttpResponse::UnprocessableEntity().json(response)
}

/// Body extraction errors become a 400 with an `ErrorResponse`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    tracing::debug!(error = %message, "Rejected request body");

    let response = HttpResponse::BadRequest()
        .json(ErrorResponse::new(error_codes::BAD_REQUEST, message));
    actix_web::error::InternalError::from_response(err, response).into()
}
