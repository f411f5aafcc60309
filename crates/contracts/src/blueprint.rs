//! ConnectorBlueprint - Config Loader output
//!
//! Complete connector configuration: sensor identity, credentials, receiver endpoint, schedule.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::Credentials;

/// Default tick period in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 15_000;

/// Complete connector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorBlueprint {
    /// Identifier embedded in every reading
    #[validate(length(min = 1, message = "sensorId cannot be empty"))]
    pub sensor_id: String,

    /// Signing identity
    #[validate(nested)]
    pub credentials: Credentials,

    /// Target endpoint
    #[validate(nested)]
    pub receiver: ReceiverConfig,

    /// Tick period (ms)
    #[serde(default = "default_interval_ms")]
    #[validate(range(min = 1, message = "interval must be >= 1 ms"))]
    pub interval: u64,
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl ConnectorBlueprint {
    /// Tick period as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }
}

/// Receiver endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverConfig {
    /// Receiver host name or address
    #[validate(length(min = 1, message = "receiver host cannot be empty"))]
    pub host: String,

    /// Receiver port
    #[validate(range(min = 1, message = "receiver port must be > 0"))]
    pub port: u16,

    /// Use TLS
    #[serde(default)]
    pub use_ssl: bool,

    /// Skip certificate validation (test/dev only)
    #[serde(default)]
    pub trust_all: bool,
}

impl ReceiverConfig {
    pub fn scheme(&self) -> &'static str {
        if self.use_ssl {
            "https"
        } else {
            "http"
        }
    }

    /// `scheme://host:port`, without trailing slash
    ///
    /// IPv6 literals are bracketed.
    pub fn base_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}", self.scheme(), self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme(), self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_JSON: &str = r#"{
        "sensorId": "S1",
        "credentials": { "connectorId": "connector", "connectorKey": "secret" },
        "receiver": { "host": "localhost", "port": 8080 }
    }"#;

    #[test]
    fn test_defaults_applied() {
        let bp: ConnectorBlueprint = serde_json::from_str(MINIMAL_JSON).unwrap();
        assert_eq!(bp.interval, DEFAULT_INTERVAL_MS);
        assert_eq!(bp.interval(), Duration::from_secs(15));
        assert!(!bp.receiver.use_ssl);
        assert!(!bp.receiver.trust_all);
    }

    #[test]
    fn test_base_url() {
        let mut bp: ConnectorBlueprint = serde_json::from_str(MINIMAL_JSON).unwrap();
        assert_eq!(bp.receiver.base_url(), "http://localhost:8080");
        bp.receiver.use_ssl = true;
        assert_eq!(bp.receiver.base_url(), "https://localhost:8080");
    }

    #[test]
    fn test_base_url_brackets_ipv6() {
        let mut bp: ConnectorBlueprint = serde_json::from_str(MINIMAL_JSON).unwrap();
        bp.receiver.host = "::1".into();
        assert_eq!(bp.receiver.base_url(), "http://[::1]:8080");
        bp.receiver.host = "[fe80::1]".into();
        assert_eq!(bp.receiver.base_url(), "http://[fe80::1]:8080");
    }

    #[test]
    fn test_serialized_blueprint_has_no_key() {
        let bp: ConnectorBlueprint = serde_json::from_str(MINIMAL_JSON).unwrap();
        let rendered = serde_json::to_string(&bp).unwrap();
        assert!(rendered.contains("connectorId"));
        assert!(!rendered.contains("connectorKey"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_nested_validation() {
        let mut bp: ConnectorBlueprint = serde_json::from_str(MINIMAL_JSON).unwrap();
        assert!(bp.validate().is_ok());
        bp.credentials.connector_key.clear();
        assert!(bp.validate().is_err());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let content = r#"{ "sensorId": "S1", "receiver": { "host": "h", "port": 1 } }"#;
        let result: Result<ConnectorBlueprint, _> = serde_json::from_str(content);
        assert!(result.is_err());
    }
}
