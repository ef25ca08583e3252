//! Buffer ingestion: frame recovery followed by `apply` per frame.

use trackside_errors::FrameError;
use trackside_telemetry_frame::{FrameReader, LayoutPolicy};

use crate::aggregator::{ApplyOutcome, TelemetryAggregator};
use crate::observer::IngestObserver;

/// What happened to one delivered buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    /// Frames recovered from the buffer
    pub frames: usize,
    /// Frames that matched a rule
    pub applied: usize,
    /// Frames dropped for lack of a rule
    pub unrecognized: usize,
    /// Applied frames with skipped fields
    pub partial: usize,
    /// Bytes covered by recovered frames
    pub consumed: usize,
    /// Error that stopped decoding, if any
    pub error: Option<FrameError>,
}

impl IngestReport {
    /// Whether the whole buffer decoded without error.
    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }
}

/// Ingest one buffer with automatic layout detection.
///
/// Frames decoded before an error stay applied; the error only ends the
/// current buffer.
pub fn ingest_buffer<O>(aggregator: &TelemetryAggregator, buf: &[u8], observer: &O) -> IngestReport
where
    O: IngestObserver + ?Sized,
{
    ingest_buffer_with(aggregator, buf, LayoutPolicy::Auto, observer)
}

/// Ingest one buffer under an explicit layout policy.
pub fn ingest_buffer_with<O>(
    aggregator: &TelemetryAggregator,
    buf: &[u8],
    policy: LayoutPolicy,
    observer: &O,
) -> IngestReport
where
    O: IngestObserver + ?Sized,
{
    observer.on_buffer(buf.len());
    let mut report = IngestReport::default();
    let mut reader = FrameReader::with_policy(buf, policy);

    for result in reader.by_ref() {
        let decoded = match result {
            Ok(decoded) => decoded,
            Err(e) => {
                observer.on_decode_error(&e);
                report.error = Some(e);
                break;
            }
        };
        report.frames = report.frames.saturating_add(1);
        let bus_id = decoded.frame.bus_id;

        match aggregator.apply(bus_id, decoded.frame.payload()) {
            ApplyOutcome::Unrecognized => {
                report.unrecognized = report.unrecognized.saturating_add(1);
                observer.on_frame_unrecognized(bus_id);
            }
            ApplyOutcome::Applied { written, skipped } => {
                report.applied = report.applied.saturating_add(1);
                observer.on_frame_applied(bus_id, written);
                if skipped > 0 {
                    report.partial = report.partial.saturating_add(1);
                    observer.on_frame_partial(bus_id, skipped);
                }
            }
        }
    }

    report.consumed = reader.offset();
    report
}
