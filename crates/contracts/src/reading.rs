//! Reading / Payload - Dispatcher output
//!
//! A payload wraps exactly one reading; the receiver requires the array form.

use serde::{Deserialize, Serialize};

use crate::{ContractError, Timestamp};

/// Single sensor reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sensor identifier
    #[serde(rename = "SID")]
    pub sensor_id: String,

    /// Moment the reading was taken
    pub timestamp: Timestamp,

    /// Measured value
    pub value: f64,
}

impl Reading {
    pub fn new(sensor_id: impl Into<String>, timestamp: Timestamp, value: f64) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            timestamp,
            value,
        }
    }
}

/// Request body sent to the receiver
///
/// Cardinality is fixed at one reading by the array type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub data: [Reading; 1],
}

impl Payload {
    pub fn single(reading: Reading) -> Self {
        Self { data: [reading] }
    }

    pub fn reading(&self) -> &Reading {
        &self.data[0]
    }

    /// Serialized transmission form
    ///
    /// The returned string is what gets signed and sent, byte for byte.
    pub fn to_json(&self) -> Result<String, ContractError> {
        Ok(serde_json::to_string(self)?)
    }
}
