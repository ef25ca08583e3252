//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use serde::Serialize;
use serde_json::json;
use trackside_errors::ErrorSeverity;
use trackside_telemetry_schema::{FieldValue, SchemaVersion};
use trackside_telemetry_state::{CounterSnapshot, TelemetrySnapshot};

use crate::error::CliError;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error),
            "severity": error_severity(error).to_string()
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    error
        .downcast_ref::<CliError>()
        .map_or("error", CliError::kind)
}

fn error_severity(error: &Error) -> ErrorSeverity {
    error
        .downcast_ref::<CliError>()
        .map_or(ErrorSeverity::Error, CliError::severity)
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print success message
pub fn print_success(message: &str, json: bool) {
    if json {
        let output = json!({
            "success": true,
            "message": message
        });
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format success message as JSON: {e}"),
        }
    } else {
        println!("{} {}", "✓".green(), message);
    }
}

/// Print warning message
pub fn print_warning(message: &str, json: bool) {
    if json {
        let output = json!({
            "success": true,
            "warning": message
        });
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format warning message as JSON: {e}"),
        }
    } else {
        println!("{} {}", "⚠".yellow(), message);
    }
}

/// One rendered refresh of the state table.
#[derive(Debug, Serialize)]
pub struct SnapshotView<'a> {
    pub schema: SchemaVersion,
    pub updates: u64,
    pub populated: usize,
    pub fields: &'a TelemetrySnapshot,
}

impl<'a> SnapshotView<'a> {
    pub fn new(snapshot: &'a TelemetrySnapshot) -> Self {
        Self {
            schema: snapshot.schema_version(),
            updates: snapshot.updates(),
            populated: snapshot.populated(),
            fields: snapshot,
        }
    }
}

/// Print a snapshot; JSON mode writes one compact line per call so a
/// stream of refreshes stays line-delimited.
pub fn print_snapshot(snapshot: &TelemetrySnapshot, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string(&SnapshotView::new(snapshot))?);
        return Ok(());
    }

    println!(
        "{} {}  {} {}  {} {}/{}",
        "schema".bold(),
        snapshot.schema_version().to_string().cyan(),
        "updates".bold(),
        snapshot.updates(),
        "populated".bold(),
        snapshot.populated(),
        snapshot.len()
    );

    let width = snapshot
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    for (name, value) in snapshot.iter() {
        let rendered = match value {
            FieldValue::NoData => value.to_string().dimmed(),
            _ => value.to_string().green(),
        };
        println!("  {name:<width$}  {rendered}");
    }
    Ok(())
}

/// Print ingest counters in human-readable format.
pub fn print_counters(counters: &CounterSnapshot) {
    println!("{}", "Ingest counters".bold());
    let rows = [
        ("Buffers", counters.buffers),
        ("Bytes", counters.bytes),
        ("Frames applied", counters.frames_applied),
        ("Frames unrecognized", counters.frames_unrecognized),
        ("Frames partial", counters.frames_partial),
        ("Decode errors", counters.decode_errors),
        ("Truncations", counters.truncations),
    ];
    for (label, value) in rows {
        let value = if value > 0 && label == "Decode errors" {
            value.to_string().yellow()
        } else {
            value.to_string().normal()
        };
        println!("  {label:<20} {value}");
    }
}
