//! Unit tests for the inbound request types

use crate::domain::entities::verification_request::{ValidateRequest, VerificationRequest};

#[test]
fn test_verification_request_uses_pascal_case_field() {
    let request = VerificationRequest::new("test@example.com");
    let json = serde_json::to_string(&request).unwrap();
    assert_eq!(json, r#"{"Email":"test@example.com"}"#);
}

#[test]
fn test_verification_request_accepts_lowercase_alias() {
    let request: VerificationRequest =
        serde_json::from_str(r#"{"email":"test@example.com"}"#).unwrap();
    assert_eq!(request.email, "test@example.com");
}

#[test]
fn test_validate_request_parses_both_casings() {
    let pascal: ValidateRequest =
        serde_json::from_str(r#"{"Email":"a@b.com","Code":"123456"}"#).unwrap();
    let lower: ValidateRequest =
        serde_json::from_str(r#"{"email":"a@b.com","code":"123456"}"#).unwrap();

    assert_eq!(pascal, lower);
    assert_eq!(pascal, ValidateRequest::new("a@b.com", "123456"));
}
