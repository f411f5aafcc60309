//! Dispatcher - periodic schedule driving the tick pipeline

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use contracts::{ConnectorBlueprint, ContractError, HttpSender};
use signer::{Signer, SignerHandle};

use crate::error::DispatcherError;
use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::schedule::ScheduleHandle;
use crate::senders::{HttpSenderConfig, ReqwestSender};
use crate::tick::{run_tick, TickContext};

/// Pending sign requests before ticks wait on the signing worker
pub const DEFAULT_SIGNER_QUEUE_CAPACITY: usize = 64;

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Identifier embedded in every reading
    pub sensor_id: String,
    /// Tick period
    pub interval: Duration,
    /// Request path on the receiver
    pub path: String,
    /// Signing worker queue size
    pub signer_queue_capacity: usize,
}

impl DispatcherConfig {
    pub fn from_blueprint(blueprint: &ConnectorBlueprint) -> Self {
        Self {
            sensor_id: blueprint.sensor_id.clone(),
            interval: blueprint.interval(),
            path: "/".to_string(),
            signer_queue_capacity: DEFAULT_SIGNER_QUEUE_CAPACITY,
        }
    }
}

/// Idle dispatcher: configured, not scheduled
pub struct Dispatcher<S> {
    config: DispatcherConfig,
    signer: Signer,
    sender: S,
}

impl<S> Dispatcher<S>
where
    S: HttpSender + Sync + 'static,
{
    /// Create an idle dispatcher
    ///
    /// # Errors
    /// `Contract` if the interval is zero.
    pub fn new(
        config: DispatcherConfig,
        signer: Signer,
        sender: S,
    ) -> Result<Self, DispatcherError> {
        if config.interval.is_zero() {
            return Err(ContractError::config_validation("interval", "must be >= 1 ms").into());
        }
        Ok(Self {
            config,
            signer,
            sender,
        })
    }

    /// Create an idle dispatcher from a validated blueprint and any sender
    ///
    /// # Errors
    /// `Signer` if the connector id is empty.
    pub fn from_blueprint(
        blueprint: &ConnectorBlueprint,
        sender: S,
    ) -> Result<Self, DispatcherError> {
        let signer = Signer::new(blueprint.credentials.clone())?;
        Self::new(DispatcherConfig::from_blueprint(blueprint), signer, sender)
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Deploy the signing service and register the timer
    ///
    /// The first tick fires one interval from now. Must be called within a
    /// tokio runtime.
    #[instrument(
        name = "dispatcher_start",
        skip(self),
        fields(sensor_id = %self.config.sensor_id, sender = self.sender.name())
    )]
    pub fn start(self) -> RunningDispatcher<S> {
        info!("Starting UrbanPulse connector...");

        let Self {
            config,
            signer,
            sender,
        } = self;

        let signer = SignerHandle::spawn(signer, config.signer_queue_capacity);
        info!(connector = %signer.connector_id(), "Signing service deployed");

        let metrics = Arc::new(DispatchMetrics::new());
        let context = Arc::new(TickContext {
            sensor_id: config.sensor_id.clone(),
            path: config.path.clone(),
            signer: signer.client(),
            sender: Arc::new(sender),
            metrics: Arc::clone(&metrics),
        });

        let tick_context = Arc::clone(&context);
        let schedule = ScheduleHandle::every(config.interval, move |tick| {
            let context = Arc::clone(&tick_context);
            // Ticks overlap freely; the timer never waits on one
            tokio::spawn(async move {
                run_tick(&context, tick).await;
            });
        });

        info!(
            interval_ms = config.interval.as_millis() as u64,
            "Successfully started connector, sending events every {} sec!",
            config.interval.as_secs_f64()
        );

        RunningDispatcher {
            config,
            schedule,
            signer,
            context,
            metrics,
        }
    }
}

/// Scheduled dispatcher
pub struct RunningDispatcher<S> {
    config: DispatcherConfig,
    schedule: ScheduleHandle,
    signer: SignerHandle,
    context: Arc<TickContext<S>>,
    metrics: Arc<DispatchMetrics>,
}

impl<S> RunningDispatcher<S> {
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Live counters
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Whether the timer is still registered
    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_active()
    }

    /// Cancel the timer, release the sender, stop the signing service
    ///
    /// Ticks already in flight are not cancelled; those still waiting for
    /// headers fail with `SigningError::Unavailable`.
    #[instrument(name = "dispatcher_stop", skip(self), fields(sensor_id = %self.config.sensor_id))]
    pub async fn stop(self) -> MetricsSnapshot {
        let fired = self.schedule.cancel().await;
        drop(self.context);
        self.signer.shutdown().await;

        let snapshot = self.metrics.snapshot();
        info!(
            ticks = fired,
            delivered = snapshot.delivered,
            unexpected_status = snapshot.unexpected_status,
            failed = snapshot.failed(),
            in_flight = snapshot.in_flight,
            "Connector stopped"
        );
        snapshot
    }
}

/// Convenience function to create an HTTP dispatcher from a blueprint
#[instrument(
    name = "dispatcher_create",
    skip(blueprint),
    fields(sensor_id = %blueprint.sensor_id, receiver = %blueprint.receiver.base_url())
)]
pub fn create_dispatcher(
    blueprint: &ConnectorBlueprint,
    request_timeout: Option<Duration>,
) -> Result<Dispatcher<ReqwestSender>, DispatcherError> {
    let sender = ReqwestSender::new(
        HttpSenderConfig::from_receiver(&blueprint.receiver).with_timeout(request_timeout),
    )?;
    Dispatcher::from_blueprint(blueprint, sender)
}
