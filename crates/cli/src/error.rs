//! Error types for tracksidectl CLI

use thiserror::Error;
use trackside_errors::{
    ConfigError, ErrorCategory, ErrorSeverity, FrameError, SchemaError, TracksideError,
};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Decode failed: {0}")]
    DecodeFailed(#[from] FrameError),

    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaError),

    #[error("Receiver error: {0}")]
    Receiver(#[from] TracksideError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Hex error: {0}")]
    HexError(#[from] hex::FromHexError),
}

impl CliError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidInput(_) | CliError::HexError(_) => 2,
            CliError::InvalidConfiguration(_) | CliError::SchemaError(_) => 3,
            CliError::DecodeFailed(_) => 4,
            CliError::Receiver(e) => match e.category() {
                ErrorCategory::Config | ErrorCategory::Schema => 3,
                ErrorCategory::Frame => 4,
                ErrorCategory::IO | ErrorCategory::Other => 5,
            },
            CliError::IoError(_) => 5,
            CliError::JsonError(_) => 1,
        }
    }

    /// Severity reported alongside the message in JSON error output.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CliError::Receiver(e) => e.severity(),
            CliError::DecodeFailed(e) => e.severity(),
            CliError::SchemaError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Short machine-readable name used in JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::InvalidInput(_) => "invalid_input",
            CliError::InvalidConfiguration(_) => "invalid_configuration",
            CliError::DecodeFailed(_) => "decode_failed",
            CliError::SchemaError(_) => "schema",
            CliError::Receiver(_) => "receiver",
            CliError::IoError(_) => "io",
            CliError::JsonError(_) => "json",
            CliError::HexError(_) => "hex",
        }
    }
}
