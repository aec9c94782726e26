//! MySQL implementations of the core store traits

mod verification_record_store;

pub use verification_record_store::MySqlVerificationRecordStore;
