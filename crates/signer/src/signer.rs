//! Signer - HMAC-SHA256 header generation

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, instrument};

use contracts::{AuthHeaders, Credentials, Timestamp, AUTH_SCHEME};

use crate::error::SigningError;

type HmacSha256 = Hmac<Sha256>;

/// Produces UPConnector authentication headers
///
/// Holds nothing but the credentials; safe to share between threads.
#[derive(Clone)]
pub struct Signer {
    credentials: Credentials,
    /// `base64(connectorId)`, constant for the signer's lifetime
    encoded_id: String,
}

impl Signer {
    /// Create a signer owning the given credentials
    ///
    /// # Errors
    /// Returns `InvalidIdentity` if the connector id is empty.
    /// The key is only checked when signing.
    pub fn new(credentials: Credentials) -> Result<Self, SigningError> {
        if credentials.connector_id.is_empty() {
            return Err(SigningError::invalid_identity("connectorId is empty"));
        }
        let encoded_id = STANDARD.encode(credentials.connector_id.as_bytes());
        Ok(Self {
            credentials,
            encoded_id,
        })
    }

    pub fn connector_id(&self) -> &str {
        &self.credentials.connector_id
    }

    /// Sign `body` with a timestamp taken now
    pub fn sign(&self, body: &str) -> Result<AuthHeaders, SigningError> {
        self.sign_at(Timestamp::now(), body)
    }

    /// Sign `body` with the given timestamp
    ///
    /// Deterministic for a fixed `(connectorKey, timestamp, body)`.
    #[instrument(
        name = "signer_sign",
        skip(self, body),
        fields(connector = %self.credentials.connector_id, body_len = body.len())
    )]
    pub fn sign_at(&self, timestamp: Timestamp, body: &str) -> Result<AuthHeaders, SigningError> {
        let signature = self.signature(&timestamp, body)?;
        debug!(timestamp = %timestamp, "Signature computed");

        Ok(AuthHeaders {
            authorization: format!("{AUTH_SCHEME} {}:{signature}", self.encoded_id),
            timestamp,
        })
    }

    /// `base64(HMAC-SHA256(key, timestamp ++ body))`
    fn signature(&self, timestamp: &Timestamp, body: &str) -> Result<String, SigningError> {
        let key = self.credentials.connector_key.as_bytes();
        if key.is_empty() {
            return Err(SigningError::invalid_key("connectorKey is empty"));
        }

        let mut mac =
            HmacSha256::new_from_slice(key).map_err(|e| SigningError::invalid_key(e.to_string()))?;
        mac.update(timestamp.as_str().as_bytes());
        mac.update(body.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("credentials", &self.credentials)
            .finish()
    }
}
