//! Receiver configuration commands.

use std::path::Path;

use anyhow::Result;
use trackside_telemetry_ingest::IngestConfig;

use crate::commands::ConfigCommands;
use crate::error::CliError;
use crate::output;

/// Execute config command.
pub async fn execute(cmd: &ConfigCommands, json: bool) -> Result<()> {
    match cmd {
        ConfigCommands::Default => show(&IngestConfig::default(), json),
        ConfigCommands::Check { path } => check(path, json),
    }
}

fn show(config: &IngestConfig, json: bool) -> Result<()> {
    if json {
        output::print_json(config)?;
    } else {
        print!("{}", config.to_yaml().map_err(CliError::from)?);
    }
    Ok(())
}

fn check(path: &Path, json: bool) -> Result<()> {
    let config = IngestConfig::load(path).map_err(CliError::from)?;
    output::print_success(
        &format!(
            "{} is valid ({} schema, {} layout, bind {})",
            path.display(),
            config.schema,
            config.frame_layout,
            config.udp.bind
        ),
        json,
    );
    Ok(())
}
