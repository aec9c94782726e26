//! Application state and factory

use actix_web::{web, App, HttpResponse};
use std::sync::Arc;
use vp_core::repositories::VerificationRecordStore;
use vp_core::services::ValidationService;
use vp_shared::errors::{error_codes, ErrorResponse};

use crate::handlers::json_error_handler;
use crate::routes::{health::health_check, validation::validate_code};

/// Shared services available to request handlers
pub struct AppState<R: VerificationRecordStore> {
    pub validation_service: Arc<ValidationService<R>>,
}

impl<R: VerificationRecordStore> AppState<R> {
    pub fn new(validation_service: Arc<ValidationService<R>>) -> Self {
        Self { validation_service }
    }
}

/// Create and configure the application
///
/// Middleware is left to the caller so tests can drive the bare routes.
pub fn create_app<R>(
    app_state: web::Data<AppState<R>>,
    max_payload_size: usize,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: VerificationRecordStore + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/verification")
                .route("/validate", web::post().to(validate_code::<R>)),
        )
        .default_service(web::route().to(|| async {
            HttpResponse::NotFound().json(ErrorResponse::new(
                error_codes::NOT_FOUND,
                "The requested resource was not found",
            ))
        }))
}
