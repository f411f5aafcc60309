//! Signing error types

use thiserror::Error;

/// Failure to produce authentication headers
///
/// Configuration-level fault; callers abandon the request and do not retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    /// Key rejected by the keyed-hash primitive
    #[error("invalid signing key: {reason}")]
    InvalidKey { reason: String },

    /// Connector identity missing
    #[error("invalid signing identity: {reason}")]
    InvalidIdentity { reason: String },

    /// Signing service stopped or dropped the request
    #[error("signing service unavailable")]
    Unavailable,
}

impl SigningError {
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }

    pub fn invalid_identity(reason: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            reason: reason.into(),
        }
    }
}
