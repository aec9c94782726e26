//! Validation of submitted verification codes

mod service;


pub use service::{ValidationService, ValidationServiceConfig};
