//! Dispatch metrics
//!
//! Records tick outcomes through the `metrics` facade. Without an installed
//! recorder every call is a no-op.

use metrics::{counter, gauge, histogram};

/// Tick outcome label values
pub mod outcome {
    pub const DELIVERED: &str = "delivered";
    pub const UNEXPECTED_STATUS: &str = "unexpected_status";
    pub const SIGNING_FAILED: &str = "signing_failed";
    pub const TRANSPORT_FAILED: &str = "transport_failed";
    pub const SERIALIZE_FAILED: &str = "serialize_failed";
}

/// Record a fired tick
///
/// # Example
///
/// ```ignore
/// use observability::metrics::{outcome, record_tick, record_tick_outcome};
///
/// record_tick("S1");
/// // ... sign and send ...
/// record_tick_outcome("S1", outcome::DELIVERED);
/// ```
pub fn record_tick(sensor_id: &str) {
    counter!(
        "urbanpulse_connector_ticks_total",
        "sensor_id" => sensor_id.to_string()
    )
    .increment(1);
}

/// Record how a tick ended
pub fn record_tick_outcome(sensor_id: &str, outcome: &'static str) {
    counter!(
        "urbanpulse_connector_tick_outcomes_total",
        "sensor_id" => sensor_id.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record the receiver's HTTP status
pub fn record_response_status(status: u16) {
    counter!(
        "urbanpulse_connector_responses_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record request round trip (send to response)
pub fn record_round_trip_ms(latency_ms: f64) {
    histogram!("urbanpulse_connector_round_trip_ms").record(latency_ms);
}

/// Record the number of ticks currently in flight
pub fn record_in_flight(in_flight: usize) {
    gauge!("urbanpulse_connector_ticks_in_flight").set(in_flight as f64);
}
