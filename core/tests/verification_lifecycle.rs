//! End-to-end lifecycle over the in-memory store and queue:
//! request -> code issued and emailed -> validated -> expired -> cleaned up.

use chrono::{Duration, Utc};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use vp_core::{
    CleanupService, CleanupServiceConfig, FixedCodeGenerator, InMemoryQueue,
    InMemoryVerificationRecordStore, MessageCodec, QueuePublisher, QueueReceiver,
    ValidateRequest, ValidationService, ValidationServiceConfig, VerificationRecord,
    VerificationRequest, VerificationService, VerificationServiceConfig,
};

const VERIFICATION_QUEUE: &str = "verification_request";
const EMAIL_QUEUE: &str = "email_request";

struct Harness {
    store: InMemoryVerificationRecordStore,
    queue: InMemoryQueue,
    verification: VerificationService<InMemoryVerificationRecordStore, InMemoryQueue>,
    validation: ValidationService<InMemoryVerificationRecordStore>,
    cleanup: CleanupService<InMemoryVerificationRecordStore>,
}

fn harness(code: &str) -> Harness {
    let store = InMemoryVerificationRecordStore::new();
    let queue = InMemoryQueue::new();
    let shared_store = Arc::new(store.clone());

    let verification = VerificationService::new(
        shared_store.clone(),
        Arc::new(queue.clone()),
        VerificationServiceConfig::default(),
    )
    .with_code_generator(Arc::new(FixedCodeGenerator::new(code)));
    let validation = ValidationService::new(shared_store.clone(), ValidationServiceConfig::default());
    let cleanup = CleanupService::new(shared_store, CleanupServiceConfig::default());

    Harness {
        store,
        queue,
        verification,
        validation,
        cleanup,
    }
}

#[tokio::test]
async fn test_issued_code_validates_until_cleaned_up() {
    let h = harness("314159");

    let payload =
        MessageCodec::encode_verification_request(&VerificationRequest::new("user@example.com"))
            .unwrap();
    h.queue.push_raw(VERIFICATION_QUEUE, payload);

    let message = h
        .queue
        .receive(VERIFICATION_QUEUE, StdDuration::from_millis(50))
        .await
        .unwrap()
        .expect("request should be queued");
    let outcome = h.verification.process_message(&message.body).await.unwrap();
    assert!(outcome.is_dispatched());
    h.queue.complete(&message).await.unwrap();

    // The email carries the stored code
    let sent = h.queue.pending(EMAIL_QUEUE);
    assert_eq!(sent.len(), 1);
    let email = MessageCodec::decode_email_request(&sent[0].body).unwrap();
    assert_eq!(email.to, "user@example.com");
    assert!(email.plain_text.contains("314159"));

    let request = ValidateRequest::new("user@example.com", "314159");
    assert!(h.validation.validate_code(&request).await.unwrap());
    assert!(!h
        .validation
        .validate_code(&ValidateRequest::new("user@example.com", "000000"))
        .await
        .unwrap());

    // Live records survive cleanup
    assert_eq!(h.cleanup.remove_expired_records().await.unwrap(), 0);
    assert!(h.validation.validate_code(&request).await.unwrap());
}

#[tokio::test]
async fn test_expired_code_is_rejected_then_removed() {
    let h = harness("271828");

    let store = InMemoryVerificationRecordStore::with_records(vec![VerificationRecord::with_expiry(
        "user@example.com",
        "271828",
        Utc::now() - Duration::seconds(1),
    )]);
    let shared = Arc::new(store.clone());
    let validation = ValidationService::new(shared.clone(), ValidationServiceConfig::default());
    let cleanup = CleanupService::new(shared, CleanupServiceConfig::default());

    let request = ValidateRequest::new("user@example.com", "271828");
    assert!(!validation.validate_code(&request).await.unwrap());

    assert_eq!(cleanup.remove_expired_records().await.unwrap(), 1);
    assert!(store.is_empty().await);

    // The harness store was never touched
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_new_request_supersedes_previous_code() {
    let store = InMemoryVerificationRecordStore::new();
    let queue = InMemoryQueue::new();
    let shared = Arc::new(store.clone());
    let validation = ValidationService::new(shared.clone(), ValidationServiceConfig::default());

    for code in ["111111", "222222"] {
        let service = VerificationService::new(
            shared.clone(),
            Arc::new(queue.clone()),
            VerificationServiceConfig::default(),
        )
        .with_code_generator(Arc::new(FixedCodeGenerator::new(code)));
        service
            .process_message(br#"{"Email":"user@example.com"}"#)
            .await
            .unwrap();
    }

    assert!(!validation
        .validate_code(&ValidateRequest::new("user@example.com", "111111"))
        .await
        .unwrap());
    assert!(validation
        .validate_code(&ValidateRequest::new("user@example.com", "222222"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_publisher_trait_object_roundtrip() {
    let h = harness("123456");
    let publisher: Arc<dyn QueuePublisher> = Arc::new(h.queue.clone());

    publisher.publish(EMAIL_QUEUE, "{}").await.unwrap();
    assert_eq!(h.queue.pending_payloads(EMAIL_QUEUE), vec!["{}".to_string()]);
}

#[test]
fn test_crate_root_exports_store_and_service_types() {
    // Both `verification` modules stay reachable by path next to the root exports
    fn assert_store<S: vp_core::repositories::verification::VerificationRecordStore>() {}
    assert_store::<InMemoryVerificationRecordStore>();

    let config: vp_core::services::verification::VerificationServiceConfig =
        VerificationServiceConfig::default();
    assert_eq!(config.code_ttl(), Duration::minutes(10));

    let err = vp_core::DomainError::configuration("bad ttl");
    assert!(matches!(err, vp_core::DomainError::Configuration { .. }));
    assert_eq!(vp_core::CODE_LENGTH, 6);
}
