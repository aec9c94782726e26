//! Expiry cleanup for verification records
//!
//! Expired records are harmless to validation but accumulate; this service
//! deletes them on demand or on a fixed interval.

mod service;

#[cfg(test)]
mod tests;

pub use service::{CleanupService, CleanupServiceConfig};
