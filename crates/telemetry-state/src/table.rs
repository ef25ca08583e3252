//! Fixed-shape field table.

use trackside_telemetry_schema::{FieldId, FieldValue};

/// One value slot per schema field plus an update counter.
///
/// The slot count is fixed at construction; writes replace values in
/// place and never add or remove slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StateTable {
    values: Vec<FieldValue>,
    updates: u64,
}

impl StateTable {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            values: vec![FieldValue::NoData; len],
            updates: 0,
        }
    }

    /// Write a batch produced by one rule. Returns the number of slots written.
    pub(crate) fn write_batch(&mut self, batch: Vec<(FieldId, FieldValue)>) -> usize {
        let mut written = 0usize;
        for (id, value) in batch {
            if let Some(slot) = self.values.get_mut(id.index()) {
                *slot = value;
                written = written.saturating_add(1);
            }
        }
        if written > 0 {
            self.updates = self.updates.wrapping_add(1);
        }
        written
    }

    pub(crate) fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub(crate) fn updates(&self) -> u64 {
        self.updates
    }

    pub(crate) fn clear(&mut self) {
        self.values.fill(FieldValue::NoData);
        self.updates = 0;
    }
}
