//! tracksidectl - Trackside telemetry receiver CLI
//!
//! Receives controller telemetry over UDP, decodes captured buffers offline,
//! lists schema fields and simulates controller traffic for bench testing.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use trackside_telemetry_schema::SchemaVersion;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{ConfigCommands, DecodeArgs, ListenArgs, SimulateArgs};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "tracksidectl")]
#[command(about = "Trackside telemetry CLI - receive, decode and simulate controller telemetry")]
#[command(version)]
#[command(long_about = "
tracksidectl receives CAN telemetry frames forwarded by the car's controller,
decodes them into the dashboard or logger field set and keeps the latest value
of every field.

Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Receive telemetry over UDP and display the latest values
    Listen(ListenArgs),

    /// Decode one captured buffer
    Decode(DecodeArgs),

    /// List the fields of a schema and the bus ids that write them
    Schema {
        /// Field set to describe
        #[arg(short, long, default_value_t = SchemaVersion::Dashboard)]
        schema: SchemaVersion,
    },

    /// Send synthetic controller frames over UDP
    Simulate(SimulateArgs),

    /// Receiver configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tracksidectl={log_level},trackside_telemetry_ingest={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match execute_command(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Listen(args) => commands::listen::execute(args, cli.json).await,
        Commands::Decode(args) => commands::decode::execute(args, cli.json).await,
        Commands::Schema { schema } => commands::schema::execute(*schema, cli.json).await,
        Commands::Simulate(args) => commands::simulate::execute(args, cli.json).await,
        Commands::Config(cmd) => commands::config::execute(cmd, cli.json).await,
    }
}
