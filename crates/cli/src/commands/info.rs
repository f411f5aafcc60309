//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{ConnectorBlueprint, AUTH_SCHEME};

use crate::cli::InfoArgs;

const REDACTED: &str = "********";

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    sensor_id: String,
    credentials: CredentialsInfo,
    receiver: ReceiverInfo,
    interval_ms: u64,
    auth_scheme: &'static str,
}

#[derive(Serialize)]
struct CredentialsInfo {
    connector_id: String,
    connector_key: &'static str,
}

#[derive(Serialize)]
struct ReceiverInfo {
    url: String,
    host: String,
    port: u16,
    use_ssl: bool,
    trust_all: bool,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let blueprint = super::load_blueprint(&args.config)?;

    if args.json {
        let info = build_config_info(&blueprint);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn build_config_info(blueprint: &ConnectorBlueprint) -> ConfigInfo {
    let receiver = &blueprint.receiver;
    ConfigInfo {
        sensor_id: blueprint.sensor_id.clone(),
        credentials: CredentialsInfo {
            connector_id: blueprint.credentials.connector_id.clone(),
            connector_key: REDACTED,
        },
        receiver: ReceiverInfo {
            url: format!("{}/", receiver.base_url()),
            host: receiver.host.clone(),
            port: receiver.port,
            use_ssl: receiver.use_ssl,
            trust_all: receiver.trust_all,
        },
        interval_ms: blueprint.interval,
        auth_scheme: AUTH_SCHEME,
    }
}

fn print_config_info(blueprint: &ConnectorBlueprint) {
    let receiver = &blueprint.receiver;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               UrbanPulse Connector Configuration             ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📡 Sensor");
    println!("   ├─ Id: {}", blueprint.sensor_id);
    println!(
        "   └─ Interval: {} ms ({} s)",
        blueprint.interval,
        blueprint.interval().as_secs_f64()
    );

    println!("\n🔑 Credentials");
    println!("   ├─ Connector Id: {}", blueprint.credentials.connector_id);
    println!("   ├─ Connector Key: {}", REDACTED);
    println!("   └─ Scheme: {} (HMAC-SHA256)", AUTH_SCHEME);

    println!("\n📤 Receiver");
    println!("   ├─ URL: PUT {}/", receiver.base_url());
    println!(
        "   ├─ TLS: {}",
        if receiver.use_ssl { "enabled" } else { "disabled" }
    );
    println!(
        "   └─ Certificate Validation: {}",
        if receiver.trust_all { "disabled (trustAll)" } else { "enabled" }
    );

    println!();
}
