//! Outcome types for the verification service

/// What happened to one inbound verification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Code saved and the email request published
    Dispatched {
        email: String,
        message_id: String,
    },
    /// The store reported no change, nothing was published
    NotSaved { email: String },
}

impl ProcessOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, ProcessOutcome::Dispatched { .. })
    }

    pub fn email(&self) -> &str {
        match self {
            ProcessOutcome::Dispatched { email, .. } | ProcessOutcome::NotSaved { email } => email,
        }
    }
}
