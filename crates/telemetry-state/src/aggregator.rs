//! Shared latest-state aggregator.

use parking_lot::RwLock;
use trackside_telemetry_schema::{Schema, SchemaVersion};

use crate::snapshot::TelemetrySnapshot;
use crate::table::StateTable;

/// Result of applying one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// No rule for this identifier; the table is untouched.
    Unrecognized,
    /// The identifier's rule ran.
    Applied {
        /// Fields written
        written: usize,
        /// Fields the payload was too short for
        skipped: usize,
    },
}

impl ApplyOutcome {
    /// Whether some fields of a recognized rule were skipped.
    pub fn is_partial(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { skipped, .. } if *skipped > 0)
    }
}

/// Latest known value of every schema field, shared by producers and readers.
///
/// Values are decoded before the lock is taken; the write section only
/// copies them into the table. Readers clone the whole table under the
/// read lock, so a snapshot never shows half of one `apply`.
///
/// # Example
///
/// ```rust
/// use trackside_telemetry_schema::{FieldValue, SchemaVersion, ids};
/// use trackside_telemetry_state::TelemetryAggregator;
///
/// let aggregator = TelemetryAggregator::new(SchemaVersion::Logger)?;
/// aggregator.apply(ids::TEMP, &[30, 0, 31, 0, 32, 0, 33, 0]);
///
/// let snapshot = aggregator.snapshot();
/// assert_eq!(snapshot.get("Temp_RR"), Some(&FieldValue::Integer(33)));
/// assert_eq!(snapshot.updates(), 1);
/// # Ok::<(), trackside_errors::SchemaError>(())
/// ```
#[derive(Debug)]
pub struct TelemetryAggregator {
    schema: Schema,
    table: RwLock<StateTable>,
}

impl TelemetryAggregator {
    /// Aggregator over a built-in schema.
    ///
    /// # Errors
    ///
    /// Returns the schema's build error.
    pub fn new(version: SchemaVersion) -> Result<Self, trackside_errors::SchemaError> {
        Ok(Self::with_schema(Schema::new(version)?))
    }

    /// Aggregator over an already built schema.
    pub fn with_schema(schema: Schema) -> Self {
        let table = RwLock::new(StateTable::new(schema.len()));
        Self { schema, table }
    }

    /// Schema in use.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Decode `payload` with the rule for `bus_id` and store the results.
    pub fn apply(&self, bus_id: u32, payload: &[u8]) -> ApplyOutcome {
        let Some(output) = self.schema.decode(bus_id, payload) else {
            return ApplyOutcome::Unrecognized;
        };
        let skipped = output.skipped;
        let written = self.table.write().write_batch(output.values);
        ApplyOutcome::Applied { written, skipped }
    }

    /// Consistent copy of the full table.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        let table = self.table.read();
        TelemetrySnapshot {
            version: self.schema.version(),
            fields: self.schema.fields(),
            values: table.values().to_vec(),
            updates: table.updates(),
        }
    }

    /// Number of `apply` calls that wrote at least one field.
    pub fn updates(&self) -> u64 {
        self.table.read().updates()
    }

    /// Return every field to `NoData`.
    pub fn reset(&self) {
        self.table.write().clear();
    }
}
