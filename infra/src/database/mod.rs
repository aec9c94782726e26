//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and migrations
//! - Transactional verification record store

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlVerificationRecordStore;
