//! Field identity and decoded values.

use core::fmt;

use serde::{Serialize, Serializer};

/// Text shown for a field that has not been written yet.
pub const NO_DATA: &str = "--";

/// Index of a field within its schema.
///
/// Only meaningful for the schema that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(u16);

impl FieldId {
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(Self)
    }

    /// Position of the field in schema order.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Latest decoded value of one telemetry field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FieldValue {
    /// Nothing decoded yet.
    #[default]
    NoData,
    /// Integer quantity (counters, raw ADC and inertial readings).
    Integer(i64),
    /// Preformatted decimal quantity (positions, averaged temperature).
    Text(String),
}

impl FieldValue {
    /// Whether a value has been decoded for this field.
    pub fn has_data(&self) -> bool {
        !matches!(self, FieldValue::NoData)
    }

    /// Integer value, if this is an integer field with data.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Text value, if this is a preformatted field with data.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::NoData => f.write_str(NO_DATA),
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// `NoData` serializes as `null`, integers as numbers, text as strings.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::NoData => serializer.serialize_none(),
            FieldValue::Integer(v) => serializer.serialize_i64(*v),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}
