//! In-memory implementation of VerificationRecordStore
//!
//! Writes are staged inside the unit of work and applied under a single write
//! lock on commit, so readers never see half of a unit. Used by tests and for
//! running the services without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::DomainError;

use super::r#trait::{VerificationRecordStore, VerificationUnitOfWork};

type RecordMap = HashMap<String, VerificationRecord>;

/// In-memory record store keyed by email
#[derive(Clone, Default)]
pub struct InMemoryVerificationRecordStore {
    records: Arc<RwLock<RecordMap>>,
    commits: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
    fail_commits: Arc<AtomicBool>,
}

impl InMemoryVerificationRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: impl IntoIterator<Item = VerificationRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.email.clone(), record))
            .collect();
        Self {
            records: Arc::new(RwLock::new(map)),
            ..Self::default()
        }
    }

    /// Number of successful commits so far
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Make `begin` fail as if the store were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make every commit fail
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Committed record for an email
    pub async fn get(&self, email: &str) -> Option<VerificationRecord> {
        self.records.read().await.get(email).cloned()
    }

    /// Number of committed records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no committed records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VerificationRecordStore for InMemoryVerificationRecordStore {
    async fn begin(&self) -> Result<Box<dyn VerificationUnitOfWork>, DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::persistence("In-memory store is unavailable"));
        }

        Ok(Box::new(InMemoryUnitOfWork {
            records: Arc::clone(&self.records),
            commits: Arc::clone(&self.commits),
            fail_commits: Arc::clone(&self.fail_commits),
            pending: Vec::new(),
            completed: false,
        }))
    }
}

enum PendingOp {
    Upsert(VerificationRecord),
    /// Removes the stored record only if it is still the one that was read
    Remove(VerificationRecord),
}

struct InMemoryUnitOfWork {
    records: Arc<RwLock<RecordMap>>,
    commits: Arc<AtomicUsize>,
    fail_commits: Arc<AtomicBool>,
    pending: Vec<PendingOp>,
    completed: bool,
}

impl InMemoryUnitOfWork {
    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.completed {
            return Err(DomainError::persistence("Unit of work already committed"));
        }
        Ok(())
    }

    /// Committed state with this unit's staged writes applied on top
    fn staged_view(&self, committed: &RecordMap, email: &str) -> Option<VerificationRecord> {
        let mut current = committed.get(email).cloned();
        for op in &self.pending {
            match op {
                PendingOp::Upsert(record) if record.email == email => {
                    current = Some(record.clone());
                }
                PendingOp::Remove(record) if record.email == email => {
                    if current.as_ref() == Some(record) {
                        current = None;
                    }
                }
                _ => {}
            }
        }
        current
    }
}

#[async_trait]
impl VerificationUnitOfWork for InMemoryUnitOfWork {
    async fn add(&mut self, record: VerificationRecord) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.pending.push(PendingOp::Upsert(record));
        Ok(())
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<VerificationRecord>, DomainError> {
        self.ensure_open()?;
        let records = self.records.read().await;
        Ok(self.staged_view(&records, email))
    }

    async fn find_expired(&mut self, now: DateTime<Utc>) -> Result<Vec<VerificationRecord>, DomainError> {
        self.ensure_open()?;
        let records = self.records.read().await;
        let mut emails: Vec<&String> = records.keys().collect();
        for op in &self.pending {
            if let PendingOp::Upsert(record) = op {
                if !records.contains_key(&record.email) {
                    emails.push(&record.email);
                }
            }
        }

        let mut expired: Vec<VerificationRecord> = emails
            .into_iter()
            .filter_map(|email| self.staged_view(&records, email))
            .filter(|record| record.is_expired_at(now))
            .collect();
        expired.sort_by(|a, b| a.email.cmp(&b.email));
        expired.dedup_by(|a, b| a.email == b.email);
        Ok(expired)
    }

    async fn remove_range(&mut self, records: &[VerificationRecord]) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.pending
            .extend(records.iter().cloned().map(PendingOp::Remove));
        Ok(())
    }

    async fn commit(&mut self) -> Result<u64, DomainError> {
        self.ensure_open()?;
        if self.fail_commits.load(Ordering::SeqCst) {
            self.pending.clear();
            self.completed = true;
            return Err(DomainError::persistence("In-memory commit rejected"));
        }

        let mut records = self.records.write().await;
        let mut affected = 0u64;
        for op in self.pending.drain(..) {
            match op {
                PendingOp::Upsert(record) => {
                    records.insert(record.email.clone(), record);
                    affected += 1;
                }
                PendingOp::Remove(record) => {
                    if records.get(&record.email) == Some(&record) {
                        records.remove(&record.email);
                        affected += 1;
                    }
                }
            }
        }

        self.completed = true;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(affected)
    }
}
