//! UrbanPulse timestamp
//!
//! `yyyy-MM-ddTHH:mm:ss.SSS+0000`: UTC, millisecond precision, numeric offset without colon.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ContractError;

/// strftime pattern of the UrbanPulse timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Formatted UrbanPulse timestamp
///
/// Kept as the exact string that is signed and transmitted, never re-rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Current wall-clock time, computed fresh on every call
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Parse and check a timestamp string
    ///
    /// # Errors
    /// Returns `InvalidTimestamp` if the string does not match the format exactly.
    pub fn parse(value: &str) -> Result<Self, ContractError> {
        let invalid = |message: String| ContractError::InvalidTimestamp {
            value: value.to_string(),
            message,
        };

        DateTime::parse_from_str(value, TIMESTAMP_FORMAT)
            .map_err(|e| invalid(e.to_string()))?;

        // chrono accepts any number of fraction digits and `+00:00`; the receiver does not
        let (datetime, offset) = value.split_at(value.len().saturating_sub(5));
        let fraction = datetime.rsplit_once('.').map(|(_, f)| f).unwrap_or("");
        if fraction.len() != 3 {
            return Err(invalid("expected millisecond precision".into()));
        }
        if offset.contains(':') || !offset.starts_with(['+', '-']) {
            return Err(invalid("expected numeric offset without colon".into()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Timestamp {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
