pub mod verification;

pub use verification::{
    InMemoryVerificationRecordStore, VerificationRecordStore, VerificationUnitOfWork,
};
