//! Ingestion observability hook.
//!
//! The core never logs. Callers that want to see dropped, partial or
//! malformed frames pass an observer to [`crate::ingest_buffer`].

use core::sync::atomic::{AtomicU64, Ordering};

use trackside_errors::FrameError;

/// Callbacks fired while a buffer is ingested. Every method defaults to a no-op.
pub trait IngestObserver: Send + Sync {
    /// A buffer of `len` bytes arrived.
    fn on_buffer(&self, _len: usize) {}

    /// A frame matched a rule and wrote `written` fields.
    fn on_frame_applied(&self, _bus_id: u32, _written: usize) {}

    /// A frame's identifier has no rule in the active schema.
    fn on_frame_unrecognized(&self, _bus_id: u32) {}

    /// A frame's payload was too short for `skipped` of its rule's fields.
    fn on_frame_partial(&self, _bus_id: u32, _skipped: usize) {}

    /// Decoding stopped early in the current buffer.
    fn on_decode_error(&self, _error: &FrameError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl IngestObserver for NoopObserver {}

/// Counter snapshot returned by [`IngestCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct CounterSnapshot {
    /// Buffers received
    pub buffers: u64,
    /// Bytes received
    pub bytes: u64,
    /// Frames that matched a rule
    pub frames_applied: u64,
    /// Frames dropped for lack of a rule
    pub frames_unrecognized: u64,
    /// Applied frames with skipped fields
    pub frames_partial: u64,
    /// Buffers cut short by a decode error
    pub decode_errors: u64,
    /// Decode errors caused by missing bytes
    pub truncations: u64,
}

impl CounterSnapshot {
    /// Frames recovered from buffers, recognized or not.
    pub fn frames_total(&self) -> u64 {
        self.frames_applied.saturating_add(self.frames_unrecognized)
    }
}

/// Relaxed atomic counters implementing [`IngestObserver`].
///
/// Counters are independent; a snapshot taken during ingestion may mix
/// values from before and after one buffer.
#[derive(Debug, Default)]
pub struct IngestCounters {
    buffers: AtomicU64,
    bytes: AtomicU64,
    frames_applied: AtomicU64,
    frames_unrecognized: AtomicU64,
    frames_partial: AtomicU64,
    decode_errors: AtomicU64,
    truncations: AtomicU64,
}

impl IngestCounters {
    /// All counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffers: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            frames_applied: AtomicU64::new(0),
            frames_unrecognized: AtomicU64::new(0),
            frames_partial: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            truncations: AtomicU64::new(0),
        }
    }

    /// Read every counter.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            buffers: self.buffers.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            frames_applied: self.frames_applied.load(Ordering::Relaxed),
            frames_unrecognized: self.frames_unrecognized.load(Ordering::Relaxed),
            frames_partial: self.frames_partial.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            truncations: self.truncations.load(Ordering::Relaxed),
        }
    }

    /// Read and zero every counter.
    pub fn take(&self) -> CounterSnapshot {
        CounterSnapshot {
            buffers: self.buffers.swap(0, Ordering::Relaxed),
            bytes: self.bytes.swap(0, Ordering::Relaxed),
            frames_applied: self.frames_applied.swap(0, Ordering::Relaxed),
            frames_unrecognized: self.frames_unrecognized.swap(0, Ordering::Relaxed),
            frames_partial: self.frames_partial.swap(0, Ordering::Relaxed),
            decode_errors: self.decode_errors.swap(0, Ordering::Relaxed),
            truncations: self.truncations.swap(0, Ordering::Relaxed),
        }
    }
}

impl IngestObserver for IngestCounters {
    #[inline]
    fn on_buffer(&self, len: usize) {
        self.buffers.fetch_add(1, Ordering::Relaxed);
        self.bytes
            .fetch_add(u64::try_from(len).unwrap_or(u64::MAX), Ordering::Relaxed);
    }

    #[inline]
    fn on_frame_applied(&self, _bus_id: u32, _written: usize) {
        self.frames_applied.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn on_frame_unrecognized(&self, _bus_id: u32) {
        self.frames_unrecognized.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn on_frame_partial(&self, _bus_id: u32, _skipped: usize) {
        self.frames_partial.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn on_decode_error(&self, error: &FrameError) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
        if error.is_truncation() {
            self.truncations.fetch_add(1, Ordering::Relaxed);
        }
    }
}
