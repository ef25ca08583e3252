//! Latest-state aggregation for Trackside telemetry.
//!
//! Producers (one per transport) hand recovered frames to a shared
//! [`TelemetryAggregator`]; a consumer reads [`TelemetrySnapshot`]s at its
//! own cadence. The table has a fixed key set: one slot per schema field,
//! starting at `NoData`.
//!
//! [`ingest_buffer`] ties frame recovery and aggregation together and
//! reports through an [`IngestObserver`], which is how drops, partial
//! decodes and malformed buffers become visible without the core logging.

#![deny(static_mut_refs)]

pub mod aggregator;
pub mod ingest;
pub mod observer;
pub mod snapshot;
mod table;

pub use aggregator::{ApplyOutcome, TelemetryAggregator};
pub use ingest::{IngestReport, ingest_buffer, ingest_buffer_with};
pub use observer::{CounterSnapshot, IngestCounters, IngestObserver, NoopObserver};
pub use snapshot::TelemetrySnapshot;
