//! Point-in-time copies of the state table.

use serde::ser::{Serialize, SerializeMap, Serializer};
use trackside_telemetry_schema::{FieldValue, SchemaVersion};

/// A complete, internally consistent copy of every field at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub(crate) version: SchemaVersion,
    pub(crate) fields: &'static [&'static str],
    pub(crate) values: Vec<FieldValue>,
    pub(crate) updates: u64,
}

impl TelemetrySnapshot {
    /// Value of a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .position(|f| *f == name)
            .and_then(|i| self.values.get(i))
    }

    /// Fields and values in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        self.fields.iter().copied().zip(self.values.iter())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of `apply` calls that wrote at least one field.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Schema the table was built from.
    pub fn schema_version(&self) -> SchemaVersion {
        self.version
    }

    /// Fields that have been written at least once.
    pub fn populated(&self) -> usize {
        self.values.iter().filter(|v| v.has_data()).count()
    }
}

/// Serializes as a JSON object keyed by field name, in schema order.
impl Serialize for TelemetrySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
