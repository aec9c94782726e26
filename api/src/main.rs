use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;
use tracing_actix_web::TracingLogger;

use vp_api::app::{create_app, AppState};
use vp_api::telemetry::init_tracing;
use vp_api::worker::{QueueWorker, WorkerConfig};
use vp_core::services::{
    CleanupService, CleanupServiceConfig, ValidationService, ValidationServiceConfig,
    VerificationService, VerificationServiceConfig,
};
use vp_infra::{DatabasePool, MySqlVerificationRecordStore, RedisQueue};
use vp_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting verification provider"
    );

    // Storage
    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the database")?;
    if config.database.run_migrations {
        pool.run_migrations().await.context("Failed to run database migrations")?;
    }
    let store = Arc::new(MySqlVerificationRecordStore::new(pool.get_pool().clone()));

    // Queue transport
    let queue = Arc::new(
        RedisQueue::connect(config.queue.clone())
            .await
            .context("Failed to connect to the queue")?,
    );
    queue
        .recover_in_flight(&config.queue.verification_queue)
        .await
        .context("Failed to recover unsettled messages")?;

    // Services
    let verification_service = Arc::new(VerificationService::new(
        store.clone(),
        queue.clone(),
        VerificationServiceConfig::from_app_config(&config)
            .context("Invalid verification service configuration")?,
    ));
    let validation_service = Arc::new(ValidationService::new(
        store.clone(),
        ValidationServiceConfig::from(&config.verification),
    ));
    let cleanup_service = Arc::new(CleanupService::new(
        store,
        CleanupServiceConfig::from(&config.cleanup),
    ));

    let cleanup_handle = cleanup_service.start_background_task();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = QueueWorker::new(
        verification_service,
        queue,
        WorkerConfig::from(&config.queue),
    );
    let worker_handle = tokio::spawn(worker.run(shutdown_rx));

    // HTTP
    let state = web::Data::new(AppState::new(validation_service));
    let server_config = config.server.clone();
    let max_payload_size = server_config.max_payload_size;

    info!(address = %server_config.bind_address(), "Starting HTTP server");

    let mut server = HttpServer::new(move || {
        create_app(state.clone(), max_payload_size).wrap(TracingLogger::default())
    })
    .keep_alive(Duration::from_secs(server_config.keep_alive));
    if server_config.workers > 0 {
        server = server.workers(server_config.workers);
    }

    server
        .bind(server_config.bind_address())
        .with_context(|| format!("Failed to bind {}", server_config.bind_address()))?
        .run()
        .await?;

    info!("HTTP server stopped, shutting down background tasks");

    let _ = shutdown_tx.send(true);
    if let Err(e) = worker_handle.await {
        tracing::error!(error = %e, "Queue worker task failed");
    }
    if let Some(handle) = cleanup_handle {
        handle.abort();
    }
    pool.close().await;

    Ok(())
}
