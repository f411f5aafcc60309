//! Command implementations.

mod info;
mod run;
mod validate;

pub use info::run_info;
pub use run::run_connector;
pub use validate::run_validate;

use anyhow::{Context, Result};
use std::path::Path;

use contracts::ConnectorBlueprint;

use crate::error::CliError;

/// Load and validate the configuration file
fn load_blueprint(path: &Path) -> Result<ConnectorBlueprint> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }

    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
