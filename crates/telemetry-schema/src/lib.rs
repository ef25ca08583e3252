//! Bus-identifier decode rules for Trackside telemetry.
//!
//! A [`Schema`] is a fixed list of field names plus one decode rule per
//! known bus identifier. Rules partition the field list: every field is
//! written by at most one identifier. Two built-in versions exist, chosen
//! once at startup via [`SchemaVersion`].
//!
//! Extraction works on the payload zero-extended to a little-endian 64-bit
//! word. A field whose inputs are not all present in a short payload is
//! skipped rather than decoded from padding.
//!
//! ```rust
//! use trackside_telemetry_schema::{FieldValue, PayloadBuilder, Schema, SchemaVersion, ids};
//!
//! let schema = Schema::new(SchemaVersion::Logger)?;
//! let payload = PayloadBuilder::new().bits(0, 11, 120).build();
//! let out = schema.decode(ids::PROX_ENCODER, &payload).ok_or("no rule")?;
//! let rpm_fl = schema.field_id("RPM_FL").ok_or("no field")?;
//! assert!(out.values.contains(&(rpm_fl, FieldValue::Integer(120))));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(static_mut_refs)]

pub mod bits;
pub mod field;
pub mod ids;
pub mod pack;
pub mod rules;
pub mod schema;

pub use field::{FieldId, FieldValue, NO_DATA};
pub use pack::PayloadBuilder;
pub use rules::{Extract, FieldRule, RuleDef};
pub use schema::{RuleOutput, Schema, SchemaVersion};
pub use trackside_errors::SchemaError;
