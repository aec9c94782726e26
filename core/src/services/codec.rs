//! Queue payload codec
//!
//! Inbound verification requests and outbound email requests travel as UTF-8
//! JSON. Decoding failures are reported as `MalformedPayload`.

use vp_shared::utils::email::{is_valid_email, normalize_email};

use crate::domain::entities::{EmailRequest, VerificationRequest};
use crate::errors::{DomainError, DomainResult};

pub struct MessageCodec;

impl MessageCodec {
    /// Decode an inbound queue payload into a verification request
    ///
    /// The email is trimmed and must look like an address.
    pub fn decode_verification_request(raw: &[u8]) -> DomainResult<VerificationRequest> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| DomainError::malformed(format!("payload is not valid UTF-8: {}", e)))?;

        let request: VerificationRequest = serde_json::from_str(text)
            .map_err(|e| DomainError::malformed(format!("invalid verification request: {}", e)))?;

        let email = normalize_email(&request.email);
        if email.is_empty() {
            return Err(DomainError::malformed("field `Email` is empty"));
        }
        if !is_valid_email(&email) {
            return Err(DomainError::malformed(
                "field `Email` is not a valid email address",
            ));
        }

        Ok(VerificationRequest::new(email))
    }

    /// Encode a verification request the way producers put it on the queue
    pub fn encode_verification_request(request: &VerificationRequest) -> DomainResult<Vec<u8>> {
        serde_json::to_vec(request)
            .map_err(|e| DomainError::invalid_argument("request", e.to_string()))
    }

    /// Encode an email request for the outbound queue
    pub fn encode_email_request(email: &EmailRequest) -> DomainResult<String> {
        serde_json::to_string(email)
            .map_err(|e| DomainError::invalid_argument("email", e.to_string()))
    }

    /// Decode an outbound email request payload
    pub fn decode_email_request(raw: &[u8]) -> DomainResult<EmailRequest> {
        serde_json::from_slice(raw)
            .map_err(|e| DomainError::malformed(format!("invalid email request: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_request() {
        let request = MessageCodec::decode_verification_request(br#"{"Email":"test@example.com"}"#)
            .unwrap();
        assert_eq!(request.email, "test@example.com");
    }

    #[test]
    fn test_decode_round_trips_encoded_request() {
        let raw = MessageCodec::encode_verification_request(&VerificationRequest::new("a@b.com"))
            .unwrap();
        let request = MessageCodec::decode_verification_request(&raw).unwrap();
        assert_eq!(request, VerificationRequest::new("a@b.com"));
    }

    #[test]
    fn test_decode_trims_email_and_ignores_extra_fields() {
        let request = MessageCodec::decode_verification_request(
            br#"{"Email":"  test@example.com ","Name":"Test"}"#,
        )
        .unwrap();
        assert_eq!(request.email, "test@example.com");
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        let cases: [&[u8]; 7] = [
            b"",
            b"not json",
            br#"{"Name":"no email"}"#,
            br#"{"Email":""}"#,
            br#"{"Email":"   "}"#,
            br#"{"Email":null}"#,
            &[0xff, 0xfe, 0xfd],
        ];

        for raw in cases {
            match MessageCodec::decode_verification_request(raw) {
                Err(DomainError::MalformedPayload { .. }) => {}
                other => panic!("Expected MalformedPayload for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_decode_rejects_non_address_email() {
        let result = MessageCodec::decode_verification_request(br#"{"Email":"not-an-address"}"#);
        assert!(matches!(result, Err(DomainError::MalformedPayload { .. })));
    }

    #[test]
    fn test_email_request_json_contains_recipient_and_parses_back() {
        let email = EmailRequest {
            to: "test@example.com".to_string(),
            subject: "Test".to_string(),
            html_body: "<p>Test</p>".to_string(),
            plain_text: "Test".to_string(),
        };

        let json = MessageCodec::encode_email_request(&email).unwrap();
        assert!(json.contains("test@example.com"));

        let parsed = MessageCodec::decode_email_request(json.as_bytes()).unwrap();
        assert_eq!(parsed, email);
    }
}
