//! Outbound email request handed to the email-sending collaborator.

use serde::{Deserialize, Serialize};

/// Formatted email, serialized as `{ To, Subject, HtmlBody, PlainText }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmailRequest {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub plain_text: String,
}

impl EmailRequest {
    /// Build the verification email for `to` carrying `code`
    ///
    /// Output depends only on the inputs; both bodies contain the code verbatim.
    pub fn verification_code(to: &str, code: &str) -> Self {
        let subject = format!("Verification Code {}", code);

        let html_body = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Verification Code</title>
</head>
<body style="margin:0; padding:0; font-family:Arial, sans-serif; background-color:#f4f4f4;">
    <div style="max-width:600px; margin:32px auto; padding:32px; background-color:#ffffff; border-radius:8px;">
        <h1 style="font-size:22px; color:#333333;">Verify your email address</h1>
        <p style="color:#555555;">Dear user,</p>
        <p style="color:#555555;">We received a request to verify <strong>{to}</strong>. Enter the code below to continue:</p>
        <p style="font-size:32px; font-weight:bold; letter-spacing:6px; color:#111111; text-align:center;">{code}</p>
        <p style="color:#555555;">If you did not request this code, you can safely ignore this email.</p>
    </div>
</body>
</html>"#,
            to = to,
            code = code,
        );

        let plain_text = format!(
            "Please verify your email address using this verification code: {code}. \
             If you did not request this code, you can safely ignore this email. ({to})",
            code = code,
            to = to,
        );

        Self {
            to: to.to_string(),
            subject,
            html_body,
            plain_text,
        }
    }
}
