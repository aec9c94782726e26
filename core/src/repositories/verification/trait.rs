//! Record store traits: a store hands out units of work, a unit of work groups
//! reads and writes that are committed atomically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::DomainError;

/// Persistent store for verification records
///
/// Every public service operation opens one unit of work, performs its reads
/// and writes through it and commits before returning. Implementations must
/// guarantee that callers never observe a partially applied unit.
#[async_trait]
pub trait VerificationRecordStore: Send + Sync {
    /// Open a new unit of work
    ///
    /// # Returns
    /// * `Ok(Box<dyn VerificationUnitOfWork>)` - Unit ready for reads and writes
    /// * `Err(DomainError::Persistence)` - Store unreachable
    async fn begin(&self) -> Result<Box<dyn VerificationUnitOfWork>, DomainError>;
}

/// A transactional boundary over the record store
///
/// Dropping a unit without calling [`commit`](Self::commit) discards its writes.
#[async_trait]
pub trait VerificationUnitOfWork: Send {
    /// Insert a record, replacing any existing record for the same email
    async fn add(&mut self, record: VerificationRecord) -> Result<(), DomainError>;

    /// Find the record stored for an email address
    ///
    /// # Returns
    /// * `Ok(Some(VerificationRecord))` - Record found (expired or not)
    /// * `Ok(None)` - No record for this email
    /// * `Err(DomainError)` - Store error
    async fn find_by_email(&mut self, email: &str) -> Result<Option<VerificationRecord>, DomainError>;

    /// Find every record with `expires_at <= now`
    async fn find_expired(&mut self, now: DateTime<Utc>) -> Result<Vec<VerificationRecord>, DomainError>;

    /// Remove a set of records in a single bulk operation
    async fn remove_range(&mut self, records: &[VerificationRecord]) -> Result<(), DomainError>;

    /// Commit all writes of this unit
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows affected by the unit's writes
    /// * `Err(DomainError::Persistence)` - Commit failed; nothing was applied
    async fn commit(&mut self) -> Result<u64, DomainError>;
}
