//! Email address utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of an email address (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 320;

// Deliberately loose: one `@`, no whitespace, a dot somewhere in the domain.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
});

/// Trim surrounding whitespace from an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

/// Check if an email address has a plausible `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    let normalized = email.trim();
    !normalized.is_empty()
        && normalized.len() <= MAX_EMAIL_LENGTH
        && EMAIL_REGEX.is_match(normalized)
}

/// Mask an email address for logging
///
/// Keeps the first character of the local part and the full domain,
/// e.g. `alice@example.com` becomes `a****@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}****@{}", first, domain)
        }
        _ => "****".to_string(),
    }
}
