//! Dispatcher error types

use thiserror::Error;

use signer::SigningError;

/// Dispatcher-specific errors
///
/// Startup-time only. Per-tick failures are reported as `TickOutcome`.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// HTTP sender creation error
    #[error("failed to create http sender '{name}': {message}")]
    SenderCreation { name: String, message: String },

    /// Signing service could not be deployed
    #[error("failed to deploy signing service: {0}")]
    Signer(#[from] SigningError),

    /// Invalid dispatcher settings (from contract)
    #[error("dispatcher config error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    /// Create a sender creation error
    pub fn sender_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SenderCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
