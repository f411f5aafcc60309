//! UPConnector authentication contracts
//!
//! Credentials owned by the signer and the header pair it produces.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::Timestamp;

/// Authorization scheme name
pub const AUTH_SCHEME: &str = "UPConnector";

/// Header carrying `UPConnector <b64(id)>:<b64(hmac)>`
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Header carrying the signed timestamp
pub const TIMESTAMP_HEADER: &str = "UrbanPulse-Timestamp";

/// Signing identity
///
/// `connector_key` is the shared HMAC secret. It is redacted from `Debug` output
/// and never serialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Connector identifier, sent base64-encoded
    #[validate(length(min = 1, message = "connectorId cannot be empty"))]
    pub connector_id: String,

    /// Shared secret used as HMAC key
    #[validate(length(min = 1, message = "connectorKey cannot be empty"))]
    #[serde(skip_serializing)]
    pub connector_key: String,
}

impl Credentials {
    pub fn new(connector_id: impl Into<String>, connector_key: impl Into<String>) -> Self {
        Self {
            connector_id: connector_id.into(),
            connector_key: connector_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("connector_id", &self.connector_id)
            .field("connector_key", &"<redacted>")
            .finish()
    }
}

/// Request authentication headers
///
/// Computed per request and discarded after use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHeaders {
    #[serde(rename = "Authorization")]
    pub authorization: String,

    /// Same string that entered the signature input
    #[serde(rename = "UrbanPulse-Timestamp")]
    pub timestamp: Timestamp,
}

impl AuthHeaders {
    /// Header name/value pairs in wire order
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [
            (AUTHORIZATION_HEADER, self.authorization.as_str()),
            (TIMESTAMP_HEADER, self.timestamp.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_key() {
        let creds = Credentials::new("connector-1", "super-secret");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("connector-1"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_credentials_camel_case() {
        let creds: Credentials =
            serde_json::from_str(r#"{"connectorId":"id","connectorKey":"key"}"#).unwrap();
        assert_eq!(creds, Credentials::new("id", "key"));
    }

    #[test]
    fn test_credentials_serialize_omits_key() {
        let creds = Credentials::new("connector-1", "super-secret");
        let rendered = serde_json::to_string(&creds).unwrap();
        assert!(rendered.contains("connectorId"));
        assert!(!rendered.contains("connectorKey"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_auth_headers_json_names() {
        let headers = AuthHeaders {
            authorization: "UPConnector aWQ=:c2ln".into(),
            timestamp: Timestamp::parse("2024-01-02T03:04:05.678+0000").unwrap(),
        };
        let value = serde_json::to_value(&headers).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["Authorization"], "UPConnector aWQ=:c2ln");
        assert_eq!(object["UrbanPulse-Timestamp"], "2024-01-02T03:04:05.678+0000");
    }

    #[test]
    fn test_pairs_order() {
        let headers = AuthHeaders {
            authorization: "UPConnector a:b".into(),
            timestamp: Timestamp::parse("2024-01-02T03:04:05.678+0000").unwrap(),
        };
        let names: Vec<_> = headers.pairs().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec![AUTHORIZATION_HEADER, TIMESTAMP_HEADER]);
    }
}
