pub mod validation;

pub use validation::{ValidateCodeRequest, ValidateCodeResponse};
