//! Tick pipeline: build payload, sign, send, interpret

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};

use contracts::{HttpSender, OutboundRequest, Payload, Reading, Timestamp, TransportError};
use observability::outcome;
use signer::{SignerClient, SigningError};

use crate::metrics::DispatchMetrics;

/// Everything a tick needs, shared by all ticks of one dispatcher
pub struct TickContext<S> {
    pub sensor_id: String,
    /// Request path on the receiver
    pub path: String,
    pub signer: SignerClient,
    pub sender: Arc<S>,
    pub metrics: Arc<DispatchMetrics>,
}

/// How a single tick ended
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Receiver answered 204
    Delivered,
    /// Receiver answered with another status; the reading counts as sent
    UnexpectedStatus { status: u16, body: String },
    /// Payload could not be serialized
    SerializeFailed(String),
    /// No headers; nothing was sent
    SigningFailed(SigningError),
    /// No response received
    TransportFailed(TransportError),
}

impl TickOutcome {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivered => outcome::DELIVERED,
            Self::UnexpectedStatus { .. } => outcome::UNEXPECTED_STATUS,
            Self::SerializeFailed(_) => outcome::SERIALIZE_FAILED,
            Self::SigningFailed(_) => outcome::SIGNING_FAILED,
            Self::TransportFailed(_) => outcome::TRANSPORT_FAILED,
        }
    }

    /// Whether the receiver got the reading
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Delivered | Self::UnexpectedStatus { .. })
    }
}

/// Fresh single-reading payload with a random value in `[0, 1)`
pub fn build_payload(sensor_id: &str) -> Payload {
    Payload::single(Reading::new(
        sensor_id,
        Timestamp::now(),
        rand::random::<f64>(),
    ))
}

/// Run one tick to completion
///
/// Never fails: every error is logged and folded into the outcome.
#[instrument(
    name = "dispatcher_tick",
    skip(ctx),
    fields(sensor_id = %ctx.sensor_id, tick = tick)
)]
pub async fn run_tick<S: HttpSender + Sync>(ctx: &TickContext<S>, tick: u64) -> TickOutcome {
    observability::record_tick(&ctx.sensor_id);
    observability::record_in_flight(ctx.metrics.tick_started());

    let result = dispatch(ctx).await;

    match &result {
        TickOutcome::Delivered => ctx.metrics.inc_delivered(),
        TickOutcome::UnexpectedStatus { .. } => ctx.metrics.inc_unexpected_status(),
        TickOutcome::SerializeFailed(_) => ctx.metrics.inc_serialize_failures(),
        TickOutcome::SigningFailed(_) => ctx.metrics.inc_signing_failures(),
        TickOutcome::TransportFailed(_) => ctx.metrics.inc_transport_failures(),
    }
    observability::record_tick_outcome(&ctx.sensor_id, result.label());
    observability::record_in_flight(ctx.metrics.tick_finished());

    result
}

async fn dispatch<S: HttpSender + Sync>(ctx: &TickContext<S>) -> TickOutcome {
    info!("Sending sensor event data");

    let body = match build_payload(&ctx.sensor_id).to_json() {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "Failed to serialize sensor event data");
            return TickOutcome::SerializeFailed(e.to_string());
        }
    };

    let auth = match ctx.signer.sign(body.as_str()).await {
        Ok(auth) => auth,
        Err(e) => {
            error!(error = %e, "Failed to generate authentication headers, skipping tick");
            return TickOutcome::SigningFailed(e);
        }
    };

    let request = OutboundRequest::signed_put(ctx.path.as_str(), &auth, body);
    let started = Instant::now();

    let response = match ctx.sender.send(request).await {
        Ok(response) => response,
        Err(e) => {
            error!(sender = ctx.sender.name(), error = %e, "Failed to send sensor event data");
            return TickOutcome::TransportFailed(e);
        }
    };

    let elapsed = started.elapsed();
    ctx.metrics.record_round_trip(elapsed);
    observability::record_round_trip_ms(elapsed.as_secs_f64() * 1_000.0);
    observability::record_response_status(response.status);
    debug!(
        status = response.status,
        elapsed_ms = elapsed.as_millis() as u64,
        "Response received"
    );

    if response.is_no_content() {
        info!(
            status = response.status,
            "Sensor event data was sent successfully"
        );
        TickOutcome::Delivered
    } else {
        warn!(
            status = response.status,
            "Sensor event data was sent, however received HTTP {} : {}",
            response.status,
            response.body
        );
        TickOutcome::UnexpectedStatus {
            status: response.status,
            body: response.body,
        }
    }
}
