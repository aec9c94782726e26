//! MySQL implementation of the verification record store.
//!
//! Each unit of work owns one SQLx transaction. Dropping an uncommitted unit
//! drops the transaction, which rolls it back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySql, MySqlPool, QueryBuilder, Row, Transaction};

use vp_core::domain::entities::VerificationRecord;
use vp_core::errors::DomainError;
use vp_core::repositories::{VerificationRecordStore, VerificationUnitOfWork};

/// Upper bound on records per DELETE statement
const DELETE_BATCH_SIZE: usize = 500;

/// MySQL implementation of VerificationRecordStore
#[derive(Clone)]
pub struct MySqlVerificationRecordStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationRecordStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &MySqlRow) -> Result<VerificationRecord, DomainError> {
        let email: String = row
            .try_get("email")
            .map_err(|e| DomainError::persistence(format!("Failed to get email: {}", e)))?;
        let code: String = row
            .try_get("code")
            .map_err(|e| DomainError::persistence(format!("Failed to get code: {}", e)))?;
        let expires_at: DateTime<Utc> = row
            .try_get("expires_at")
            .map_err(|e| DomainError::persistence(format!("Failed to get expires_at: {}", e)))?;

        Ok(VerificationRecord::with_expiry(email, code, expires_at))
    }
}

#[async_trait]
impl VerificationRecordStore for MySqlVerificationRecordStore {
    async fn begin(&self) -> Result<Box<dyn VerificationUnitOfWork>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(MySqlUnitOfWork {
            tx: Some(tx),
            affected: 0,
        }))
    }
}

struct MySqlUnitOfWork {
    /// `None` once committed
    tx: Option<Transaction<'static, MySql>>,
    /// Records changed by this unit so far
    affected: u64,
}

impl MySqlUnitOfWork {
    fn tx(&mut self) -> Result<&mut Transaction<'static, MySql>, DomainError> {
        self.tx
            .as_mut()
            .ok_or_else(|| DomainError::persistence("Unit of work already committed"))
    }
}

#[async_trait]
impl VerificationUnitOfWork for MySqlUnitOfWork {
    async fn add(&mut self, record: VerificationRecord) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO verification_requests (email, code, expires_at)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE code = VALUES(code), expires_at = VALUES(expires_at)
        "#;

        let tx = self.tx()?;
        let result = sqlx::query(query)
            .bind(&record.email)
            .bind(&record.code)
            .bind(record.expires_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to save verification record: {}", e)))?;

        // ON DUPLICATE KEY UPDATE reports 2 for a replaced row
        self.affected += result.rows_affected().min(1);
        Ok(())
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<VerificationRecord>, DomainError> {
        let query = r#"
            SELECT email, code, expires_at
            FROM verification_requests
            WHERE email = ?
            LIMIT 1
        "#;

        let tx = self.tx()?;
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to find verification record: {}", e)))?;

        row.as_ref()
            .map(MySqlVerificationRecordStore::row_to_record)
            .transpose()
    }

    async fn find_expired(&mut self, now: DateTime<Utc>) -> Result<Vec<VerificationRecord>, DomainError> {
        // Locked so a concurrent save cannot slip in between read and delete
        let query = r#"
            SELECT email, code, expires_at
            FROM verification_requests
            WHERE expires_at <= ?
            FOR UPDATE
        "#;

        let tx = self.tx()?;
        let rows = sqlx::query(query)
            .bind(now)
            .fetch_all(&mut **tx)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to find expired records: {}", e)))?;

        rows.iter()
            .map(MySqlVerificationRecordStore::row_to_record)
            .collect()
    }

    async fn remove_range(&mut self, records: &[VerificationRecord]) -> Result<(), DomainError> {
        let tx = self.tx()?;
        let mut removed = 0;

        for batch in records.chunks(DELETE_BATCH_SIZE) {
            // Only rows still holding the code and expiry that were read
            let mut builder: QueryBuilder<MySql> =
                QueryBuilder::new("DELETE FROM verification_requests WHERE ");
            let mut first = true;
            for record in batch {
                if !first {
                    builder.push(" OR ");
                }
                first = false;
                builder
                    .push("(email = ")
                    .push_bind(&record.email)
                    .push(" AND code = ")
                    .push_bind(&record.code)
                    .push(" AND expires_at = ")
                    .push_bind(record.expires_at)
                    .push(")");
            }

            let result = builder
                .build()
                .execute(&mut **tx)
                .await
                .map_err(|e| DomainError::persistence(format!("Failed to delete records: {}", e)))?;
            removed += result.rows_affected();
        }

        self.affected += removed;
        Ok(())
    }

    async fn commit(&mut self) -> Result<u64, DomainError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| DomainError::persistence("Unit of work already committed"))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to commit transaction: {}", e)))?;

        Ok(self.affected)
    }
}
