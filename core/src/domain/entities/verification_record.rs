//! Verification record entity persisted by the record store.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// Length of a verification code
pub const CODE_LENGTH: usize = 6;

/// A code issued to an email address, valid until `expires_at`
///
/// Records are keyed by email: the store keeps at most one per address and
/// saving a new code for the same address replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Email address the code was sent to
    pub email: String,

    /// Six ASCII digits, leading zeros allowed
    pub code: String,

    /// Instant after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Create a record that expires `ttl` from now
    ///
    /// Fails with `DomainError::Configuration` when `ttl` is not positive or
    /// the expiry instant cannot be represented.
    pub fn new(
        email: impl Into<String>,
        code: impl Into<String>,
        ttl: Duration,
    ) -> DomainResult<Self> {
        if ttl <= Duration::zero() {
            return Err(DomainError::configuration("code TTL must be positive"));
        }

        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| DomainError::configuration("code TTL is out of range"))?;

        Ok(Self::with_expiry(email, code, expires_at))
    }

    /// Create a record with an explicit expiry instant
    pub fn with_expiry(
        email: impl Into<String>,
        code: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            code: code.into(),
            expires_at,
        }
    }

    /// Check if the record has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check if the record is expired at the given instant
    ///
    /// A record whose expiry equals `now` counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check whether a string is a well-formed verification code
    pub fn is_valid_code_format(code: &str) -> bool {
        code.len() == CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit())
    }
}
