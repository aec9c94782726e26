//! Domain error taxonomy shared by every service.

mod domain_error;


pub use domain_error::{DomainError, DomainResult};
