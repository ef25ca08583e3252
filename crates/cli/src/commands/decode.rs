//! Offline decode of one captured buffer.

use anyhow::Result;
use colored::*;
use serde::Serialize;
use trackside_telemetry_frame::{DecodedFrame, FrameReader};
use trackside_telemetry_schema::ids;
use trackside_telemetry_state::{ApplyOutcome, TelemetryAggregator, TelemetrySnapshot};

use crate::commands::DecodeArgs;
use crate::error::CliError;
use crate::output::{self, SnapshotView};

#[derive(Debug, Serialize)]
struct FrameRow {
    offset: usize,
    layout: &'static str,
    consumed: usize,
    bus_id: u32,
    source: Option<&'static str>,
    payload: String,
    status: &'static str,
    written: usize,
    skipped: usize,
}

#[derive(Debug, Serialize)]
struct DecodeSummary<'a> {
    bytes: usize,
    consumed: usize,
    frames: Vec<FrameRow>,
    error: Option<String>,
    snapshot: SnapshotView<'a>,
}

struct DecodeRun {
    bytes: usize,
    consumed: usize,
    frames: Vec<FrameRow>,
    error: Option<trackside_errors::FrameError>,
    snapshot: TelemetrySnapshot,
}

/// Execute decode command.
pub async fn execute(args: &DecodeArgs, json: bool) -> Result<()> {
    let buffer = read_input(args)?;
    let run = decode_buffer(&buffer, args)?;

    if json {
        output::print_json(&DecodeSummary {
            bytes: run.bytes,
            consumed: run.consumed,
            frames: run.frames,
            error: run.error.as_ref().map(ToString::to_string),
            snapshot: SnapshotView::new(&run.snapshot),
        })?;
    } else {
        print_human(&run)?;
    }

    match run.error {
        Some(e) if args.strict => Err(CliError::DecodeFailed(e).into()),
        _ => Ok(()),
    }
}

fn read_input(args: &DecodeArgs) -> Result<Vec<u8>, CliError> {
    match (&args.hex, &args.file) {
        (_, Some(path)) => Ok(std::fs::read(path)?),
        (Some(text), None) => parse_hex(text),
        (None, None) => Err(CliError::InvalidInput(
            "provide a hex buffer or --file".to_string(),
        )),
    }
}

/// Parse hex text, ignoring whitespace, ':' separators and a leading `0x`.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, CliError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = body
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    Ok(hex::decode(digits)?)
}

// Mirrors `ingest_buffer_with`, which reports through observers that never see
// frame offsets or payloads; keep the two loops in step.
fn decode_buffer(buffer: &[u8], args: &DecodeArgs) -> Result<DecodeRun, CliError> {
    let aggregator = TelemetryAggregator::new(args.schema)?;
    let mut reader = FrameReader::with_policy(buffer, args.layout);
    let mut frames = Vec::new();
    let mut error = None;

    loop {
        let offset = reader.offset();
        match reader.next() {
            Some(Ok(decoded)) => {
                let outcome = aggregator.apply(decoded.frame.bus_id, decoded.frame.payload());
                frames.push(frame_row(offset, &decoded, outcome));
            }
            Some(Err(e)) => {
                error = Some(e);
                break;
            }
            None => break,
        }
    }

    Ok(DecodeRun {
        bytes: buffer.len(),
        consumed: reader.offset(),
        frames,
        error,
        snapshot: aggregator.snapshot(),
    })
}

fn frame_row(offset: usize, decoded: &DecodedFrame, outcome: ApplyOutcome) -> FrameRow {
    let (status, written, skipped) = match outcome {
        ApplyOutcome::Unrecognized => ("unrecognized", 0, 0),
        ApplyOutcome::Applied { written, skipped } if skipped > 0 => ("partial", written, skipped),
        ApplyOutcome::Applied { written, skipped } => ("applied", written, skipped),
    };
    FrameRow {
        offset,
        layout: decoded.layout.name(),
        consumed: decoded.consumed,
        bus_id: decoded.frame.bus_id,
        source: ids::role_name(decoded.frame.bus_id),
        payload: hex::encode(decoded.frame.payload()),
        status,
        written,
        skipped,
    }
}

fn print_human(run: &DecodeRun) -> Result<(), CliError> {
    println!(
        "{} {} bytes, {} frames",
        "Buffer".bold(),
        run.bytes,
        run.frames.len()
    );
    for row in &run.frames {
        let status = match row.status {
            "applied" => row.status.green(),
            "partial" => row.status.yellow(),
            _ => row.status.dimmed(),
        };
        println!(
            "  @{:<4} {:<7} {:#05x} {:<12} {:<16} {} ({} written)",
            row.offset,
            row.layout,
            row.bus_id,
            row.source.unwrap_or("-"),
            row.payload,
            status,
            row.written
        );
    }
    if let Some(e) = &run.error {
        output::print_warning(&format!("decoding stopped at byte {}: {e}", run.consumed), false);
    }
    println!();
    output::print_snapshot(&run.snapshot, false)
}
