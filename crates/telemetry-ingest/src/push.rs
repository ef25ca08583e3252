//! Push-callback producer.
//!
//! Subscription clients deliver whole message payloads from their own
//! callback context. [`PushIngest`] is the cheap, cloneable entry point such
//! a callback calls.

use std::sync::Arc;

use trackside_telemetry_frame::LayoutPolicy;
use trackside_telemetry_state::{IngestCounters, IngestReport, TelemetryAggregator, ingest_buffer_with};
use tracing::{debug, trace};

/// Ingestion entry point for push-style transports.
#[derive(Debug, Clone)]
pub struct PushIngest {
    aggregator: Arc<TelemetryAggregator>,
    counters: Arc<IngestCounters>,
    policy: LayoutPolicy,
}

impl PushIngest {
    /// Entry point feeding `aggregator` with automatic layout detection.
    pub fn new(aggregator: Arc<TelemetryAggregator>) -> Self {
        Self {
            aggregator,
            counters: Arc::new(IngestCounters::new()),
            policy: LayoutPolicy::Auto,
        }
    }

    /// Use a fixed layout policy.
    pub fn with_layout(mut self, policy: LayoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Share counters with other producers.
    pub fn with_counters(mut self, counters: Arc<IngestCounters>) -> Self {
        self.counters = counters;
        self
    }

    /// Counters fed by this entry point.
    pub fn counters(&self) -> &Arc<IngestCounters> {
        &self.counters
    }

    /// Ingest one delivered message. Never fails; problems are logged,
    /// counted and returned in the report.
    pub fn on_message(&self, source: &str, payload: &[u8]) -> IngestReport {
        let report = ingest_buffer_with(&self.aggregator, payload, self.policy, self.counters.as_ref());
        match report.error {
            Some(e) => debug!(
                source,
                frames = report.frames,
                consumed = report.consumed,
                "Message decode stopped early: {e}"
            ),
            None => trace!(source, frames = report.frames, "Message ingested"),
        }
        report
    }
}
