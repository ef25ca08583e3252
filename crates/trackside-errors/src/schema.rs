//! Decode-rule table errors.
//!
//! Raised while resolving a schema's rule table against its field list.
//! A schema that fails to build must never reach the aggregator.

/// Schema construction failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A rule writes a field the schema does not declare.
    #[error("rule for bus id {bus_id:#05x} writes unknown field '{field}'")]
    UnknownField {
        /// Owning bus identifier
        bus_id: u32,
        /// Field name referenced by the rule
        field: String,
    },

    /// The same field name is declared twice.
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    /// Two bus identifiers write the same field.
    #[error("field '{field}' is written by both bus id {first:#05x} and {second:#05x}")]
    OverlappingField {
        /// Field name
        field: String,
        /// First owning bus identifier
        first: u32,
        /// Second owning bus identifier
        second: u32,
    },

    /// Two rules are registered for one bus identifier.
    #[error("bus id {0:#05x} has more than one decode rule")]
    DuplicateRule(u32),

    /// A field extraction reaches outside the 8-byte payload.
    #[error("rule for bus id {bus_id:#05x} extracts '{field}' outside the 8-byte payload")]
    ExtractionOutOfRange {
        /// Owning bus identifier
        bus_id: u32,
        /// Field name
        field: String,
    },

    /// A schema version name could not be parsed.
    #[error("unknown schema version '{0}', expected one of: dashboard, logger")]
    UnknownVersion(String),
}
