//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// UrbanPulse Connector - periodic signed telemetry push
#[derive(Parser, Debug)]
#[command(
    name = "urbanpulse-connector",
    author,
    version,
    about = "UrbanPulse periodic telemetry push connector",
    long_about = "Pushes one sensor reading per interval to an UrbanPulse receiver.\n\n\
                  Every request is an HTTP PUT carrying a UPConnector HMAC-SHA256 \n\
                  signature over the timestamp and the exact request body."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "URBANPULSE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "URBANPULSE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the connector until interrupted
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective configuration (key redacted)
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (JSON or TOML)
    #[arg(
        short,
        long,
        default_value = "config.json",
        env = "URBANPULSE_CONFIG"
    )]
    pub config: PathBuf,

    /// Override receiver host from configuration
    #[arg(long, env = "URBANPULSE_RECEIVER_HOST")]
    pub host: Option<String>,

    /// Override receiver port from configuration
    #[arg(long, env = "URBANPULSE_RECEIVER_PORT")]
    pub port: Option<u16>,

    /// Override sensor id from configuration
    #[arg(long, env = "URBANPULSE_SENSOR_ID")]
    pub sensor_id: Option<String>,

    /// Override tick interval in milliseconds
    #[arg(long, env = "URBANPULSE_INTERVAL")]
    pub interval: Option<u64>,

    /// Stop after this many seconds (0 = run until interrupted)
    #[arg(long, default_value = "0", env = "URBANPULSE_TIMEOUT")]
    pub timeout: u64,

    /// Per-request deadline in seconds (0 = client default)
    #[arg(long, default_value = "0", env = "URBANPULSE_REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    /// Sign and log every request instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Prometheus metrics port (disabled when absent)
    #[arg(long, env = "URBANPULSE_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.json", env = "URBANPULSE_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json", env = "URBANPULSE_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
