//! Live receiver: UDP producer plus periodic snapshot rendering.

use std::sync::Arc;

use anyhow::Result;
use colored::*;
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use trackside_telemetry_ingest::{IngestConfig, UdpIngest};
use trackside_telemetry_state::{CounterSnapshot, TelemetryAggregator};
use tracing::{info, warn};

use crate::commands::ListenArgs;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ListenSummary {
    listen: String,
    schema: String,
    layout: String,
    refreshes: u64,
    updates: u64,
    counters: CounterSnapshot,
}

/// Execute listen command.
pub async fn execute(args: &ListenArgs, json: bool) -> Result<()> {
    let config = resolve_config(args)?;
    let aggregator = Arc::new(TelemetryAggregator::new(config.schema).map_err(CliError::from)?);

    let handle = UdpIngest::new(Arc::clone(&aggregator), config.udp.clone())
        .with_layout(config.frame_layout)
        .spawn()
        .await
        .map_err(CliError::from)?;
    let local_addr = handle.local_addr();

    if !json {
        println!(
            "{} {} ({} schema, {} layout). Press Ctrl-C to stop.",
            "Listening on".bold(),
            local_addr.to_string().cyan(),
            config.schema,
            config.frame_layout
        );
    }

    let mut ticker = tokio::time::interval(config.refresh_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut refreshes: u64 = 0;
    let mut last_rendered: Option<u64> = None;
    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                if let Err(e) = signal {
                    warn!("Failed to listen for Ctrl-C: {e}");
                }
                info!("Interrupted");
                break;
            }
            _ = ticker.tick() => {
                let snapshot = aggregator.snapshot();
                // Re-render only when something was written since the last refresh.
                if last_rendered != Some(snapshot.updates()) {
                    output::print_snapshot(&snapshot, json)?;
                    last_rendered = Some(snapshot.updates());
                }
                refreshes = refreshes.saturating_add(1);
                if args.count.is_some_and(|limit| refreshes >= limit) {
                    break;
                }
            }
        }
    }

    let counters = handle.counters().snapshot();
    handle.shutdown().await.map_err(CliError::from)?;

    let summary = ListenSummary {
        listen: local_addr.to_string(),
        schema: config.schema.to_string(),
        layout: config.frame_layout.to_string(),
        refreshes,
        updates: aggregator.updates(),
        counters,
    };
    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!();
        output::print_counters(&summary.counters);
        println!("  {:<20} {}", "Refreshes", summary.refreshes);
    }
    Ok(())
}

/// Merge the optional config file with command-line overrides.
fn resolve_config(args: &ListenArgs) -> Result<IngestConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => IngestConfig::load(path)?,
        None => IngestConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.udp.bind = bind;
    }
    if let Some(schema) = args.schema {
        config.schema = schema;
    }
    if let Some(layout) = args.layout {
        config.frame_layout = layout;
    }
    if let Some(interval) = args.interval_ms {
        config.refresh_interval_ms = interval;
    }
    config.validate()?;
    Ok(config)
}
