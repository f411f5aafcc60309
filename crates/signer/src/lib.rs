//! # Signer
//!
//! UPConnector request authentication.
//!
//! Responsibilities:
//! - Compute `HMAC-SHA256(connectorKey, timestamp ++ body)`
//! - Build the `Authorization` / `UrbanPulse-Timestamp` header pair
//! - Serve signing requests from an isolated worker task

pub mod error;
pub mod handle;
pub mod signer;

pub use contracts::{AuthHeaders, Credentials};
pub use error::SigningError;
pub use handle::{SignerClient, SignerHandle};
pub use signer::Signer;
