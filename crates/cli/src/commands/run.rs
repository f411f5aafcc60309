//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use config_loader::ConfigLoader;
use contracts::{ConnectorBlueprint, HttpSender};
use dispatcher::{create_dispatcher, Dispatcher, LogSender, MetricsSnapshot};

use crate::cli::RunArgs;
use crate::error::CliError;

/// Execute the `run` command
pub async fn run_connector(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    let mut blueprint = super::load_blueprint(&args.config)?;

    let overridden = apply_overrides(&mut blueprint, args);
    if !overridden.is_empty() {
        ConfigLoader::validate(&blueprint)
            .map_err(|e| CliError::invalid_override(format!("{} ({e})", overridden.join(", "))))?;
    }

    info!(
        sensor_id = %blueprint.sensor_id,
        connector = %blueprint.credentials.connector_id,
        receiver = %blueprint.receiver.base_url(),
        interval_ms = blueprint.interval,
        "Configuration loaded"
    );

    let timeout = seconds(args.timeout);

    if args.dry_run {
        info!("Dry run mode - requests are signed and logged, not sent");
        print_config_summary(&blueprint);
        let dispatcher = Dispatcher::from_blueprint(&blueprint, LogSender::new("dry-run"))
            .context("Failed to create dispatcher")?;
        return serve(dispatcher, timeout).await;
    }

    let dispatcher = create_dispatcher(&blueprint, seconds(args.request_timeout))
        .context("Failed to create dispatcher")?;
    serve(dispatcher, timeout).await
}

/// Apply command-line overrides, returns the names of overridden fields
fn apply_overrides(blueprint: &mut ConnectorBlueprint, args: &RunArgs) -> Vec<&'static str> {
    let mut overridden = Vec::new();

    if let Some(ref host) = args.host {
        info!(host = %host, "Overriding receiver host from CLI");
        blueprint.receiver.host = host.clone();
        overridden.push("receiver.host");
    }
    if let Some(port) = args.port {
        info!(port = %port, "Overriding receiver port from CLI");
        blueprint.receiver.port = port;
        overridden.push("receiver.port");
    }
    if let Some(ref sensor_id) = args.sensor_id {
        info!(sensor_id = %sensor_id, "Overriding sensor id from CLI");
        blueprint.sensor_id = sensor_id.clone();
        overridden.push("sensorId");
    }
    if let Some(interval) = args.interval {
        info!(interval_ms = interval, "Overriding interval from CLI");
        blueprint.interval = interval;
        overridden.push("interval");
    }

    overridden
}

fn seconds(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_secs(value))
}

/// Run until a shutdown signal or the timeout, then stop and report
async fn serve<S>(dispatcher: Dispatcher<S>, timeout: Option<Duration>) -> Result<()>
where
    S: HttpSender + Sync + 'static,
{
    let running = dispatcher.start();

    let shutdown = shutdown_signal();
    match timeout {
        Some(limit) => {
            tokio::select! {
                _ = tokio::time::sleep(limit) => {
                    info!(
                        timeout_secs = limit.as_secs(),
                        "Timeout reached, stopping connector..."
                    );
                }
                result = shutdown => {
                    result?;
                    warn!("Received shutdown signal, stopping connector...");
                }
            }
        }
        None => {
            shutdown.await?;
            warn!("Received shutdown signal, stopping connector...");
        }
    }

    let snapshot = running.stop().await;
    print_run_summary(&snapshot);

    info!("UrbanPulse connector finished");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| CliError::signal("Ctrl+C", e))
    };

    #[cfg(unix)]
    let terminate = async {
        let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .map_err(|e| CliError::signal("SIGTERM", e))?;
        signal.recv().await;
        Ok::<(), CliError>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<(), CliError>>();

    tokio::select! {
        result = ctrl_c => result?,
        result = terminate => result?,
    }
    Ok(())
}

fn print_config_summary(blueprint: &ConnectorBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Sensor: {}", blueprint.sensor_id);
    println!("Connector: {}", blueprint.credentials.connector_id);
    println!("Receiver: {}/", blueprint.receiver.base_url());
    println!("Interval: {} ms", blueprint.interval);
    println!();
}

fn print_run_summary(snapshot: &MetricsSnapshot) {
    info!(
        ticks = snapshot.ticks,
        delivered = snapshot.delivered,
        unexpected_status = snapshot.unexpected_status,
        signing_failures = snapshot.signing_failures,
        transport_failures = snapshot.transport_failures,
        still_in_flight = snapshot.in_flight,
        "Dispatch summary"
    );

    println!("\n=== Dispatch Summary ===\n");
    println!("Ticks:              {}", snapshot.ticks);
    println!("Delivered (204):    {}", snapshot.delivered);
    println!("Unexpected status:  {}", snapshot.unexpected_status);
    println!("Signing failures:   {}", snapshot.signing_failures);
    println!("Transport failures: {}", snapshot.transport_failures);
    if let Some(mean) = snapshot.mean_round_trip() {
        println!(
            "Round trip:         mean {:.1} ms, max {:.1} ms",
            mean.as_secs_f64() * 1_000.0,
            snapshot.round_trip_max.as_secs_f64() * 1_000.0
        );
    }
    println!();
}
