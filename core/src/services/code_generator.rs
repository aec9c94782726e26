//! Verification code generation

use rand::Rng;

use crate::domain::entities::verification_record::CODE_LENGTH;

/// Source of verification codes
pub trait CodeGenerator: Send + Sync {
    /// Produce a code of exactly `CODE_LENGTH` ASCII digits
    fn generate(&self) -> String;
}

/// Uniformly random codes from the thread-local RNG
///
/// Codes are short-lived and tied to a mailbox, they are not secrets of
/// cryptographic strength.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let upper = 10u32.pow(CODE_LENGTH as u32);
        let number = rand::thread_rng().gen_range(0..upper);
        format!("{:0width$}", number, width = CODE_LENGTH)
    }
}

/// Always returns the same code
#[derive(Debug, Clone)]
pub struct FixedCodeGenerator {
    code: String,
}

impl FixedCodeGenerator {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.code.clone()
    }
}
