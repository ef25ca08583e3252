//! Command implementations for tracksidectl CLI

pub mod config;
pub mod decode;
pub mod listen;
pub mod schema;
pub mod simulate;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use trackside_telemetry_frame::{LayoutPolicy, WireLayout};
use trackside_telemetry_schema::SchemaVersion;

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Receiver configuration file (.yaml, .yml or .json)
    #[arg(short, long, env = "TRACKSIDE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Local address to bind, overrides the config file
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Field set to decode into (dashboard or logger)
    #[arg(short, long)]
    pub schema: Option<SchemaVersion>,

    /// Frame layout: auto, padded, packed or minimal
    #[arg(short, long)]
    pub layout: Option<LayoutPolicy>,

    /// Refresh interval in milliseconds
    #[arg(short, long)]
    pub interval_ms: Option<u64>,

    /// Stop after this many refreshes
    #[arg(short = 'n', long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Buffer as hex; whitespace, ':' separators and a 0x prefix are ignored
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub hex: Option<String>,

    /// Read the raw buffer from a file instead
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Field set to decode into
    #[arg(short, long, default_value_t = SchemaVersion::Dashboard)]
    pub schema: SchemaVersion,

    /// Frame layout: auto, padded, packed or minimal
    #[arg(short, long, default_value_t = LayoutPolicy::Auto)]
    pub layout: LayoutPolicy,

    /// Fail with a non-zero exit code if decoding stops early
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Receiver address to send datagrams to
    #[arg(short, long)]
    pub target: SocketAddr,

    /// Frame layout to encode with
    #[arg(short, long, default_value_t = WireLayout::Padded24)]
    pub layout: WireLayout,

    /// Datagrams per second
    #[arg(short, long, default_value_t = 50)]
    pub rate_hz: u32,

    /// Frames concatenated into one datagram
    #[arg(short, long, default_value_t = 6)]
    pub frames_per_datagram: usize,

    /// Stop after this many send attempts; runs until Ctrl-C otherwise
    #[arg(short = 'n', long)]
    pub count: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the default configuration as YAML
    Default,

    /// Load and validate a configuration file
    Check {
        /// Configuration file (.yaml, .yml or .json)
        path: PathBuf,
    },
}
