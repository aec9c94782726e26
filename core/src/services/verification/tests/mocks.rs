//! Mock record store for paths the in-memory store cannot reach

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::entities::VerificationRecord;
use crate::errors::DomainError;
use crate::repositories::{VerificationRecordStore, VerificationUnitOfWork};

/// Store whose commits succeed without changing anything
#[derive(Default)]
pub struct UnchangedRecordStore {
    pub adds: Arc<AtomicUsize>,
}

struct UnchangedUnit {
    adds: Arc<AtomicUsize>,
}

#[async_trait]
impl VerificationRecordStore for UnchangedRecordStore {
    async fn begin(&self) -> Result<Box<dyn VerificationUnitOfWork>, DomainError> {
        Ok(Box::new(UnchangedUnit {
            adds: self.adds.clone(),
        }))
    }
}

#[async_trait]
impl VerificationUnitOfWork for UnchangedUnit {
    async fn add(&mut self, _record: VerificationRecord) -> Result<(), DomainError> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_by_email(&mut self, _email: &str) -> Result<Option<VerificationRecord>, DomainError> {
        Ok(None)
    }

    async fn find_expired(&mut self, _now: DateTime<Utc>) -> Result<Vec<VerificationRecord>, DomainError> {
        Ok(Vec::new())
    }

    async fn remove_range(&mut self, _records: &[VerificationRecord]) -> Result<(), DomainError> {
        Ok(())
    }

    async fn commit(&mut self) -> Result<u64, DomainError> {
        Ok(0)
    }
}
