//! Validated, indexed decode-rule schemas.

use core::fmt;
use core::str::FromStr;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use trackside_errors::SchemaError;

use crate::field::{FieldId, FieldValue};
use crate::rules::{DASHBOARD_FIELDS, DASHBOARD_RULES, Extract, LOGGER_FIELDS, LOGGER_RULES, RuleDef};

/// Built-in field set, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// Pit-wall dashboard: averaged RPM and temperature, no orientation.
    #[default]
    Dashboard,
    /// On-car logger: every raw channel, per-corner temperatures.
    Logger,
}

impl SchemaVersion {
    /// All built-in versions.
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::Dashboard, SchemaVersion::Logger];

    /// Lowercase name used in configuration.
    pub const fn name(self) -> &'static str {
        match self {
            SchemaVersion::Dashboard => "dashboard",
            SchemaVersion::Logger => "logger",
        }
    }

    fn tables(self) -> (&'static [&'static str], &'static [RuleDef]) {
        match self {
            SchemaVersion::Dashboard => (DASHBOARD_FIELDS, DASHBOARD_RULES),
            SchemaVersion::Logger => (LOGGER_FIELDS, LOGGER_RULES),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaVersion::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SchemaError::UnknownVersion(s.to_string()))
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    bus_id: u32,
    fields: Vec<(FieldId, Extract)>,
}

/// Values produced by one rule for one payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleOutput {
    /// Fields the payload covered, in rule order.
    pub values: Vec<(FieldId, FieldValue)>,
    /// Fields of the rule the payload was too short for.
    pub skipped: usize,
}

/// A field list plus the rules that write it, validated as a partition.
#[derive(Debug, Clone)]
pub struct Schema {
    version: SchemaVersion,
    fields: &'static [&'static str],
    rules: Vec<CompiledRule>,
    owners: Vec<Option<u32>>,
    by_name: HashMap<&'static str, FieldId>,
}

impl Schema {
    /// Build one of the built-in schemas.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in tables are inconsistent.
    pub fn new(version: SchemaVersion) -> Result<Self, SchemaError> {
        let (fields, rules) = version.tables();
        Self::from_tables(version, fields, rules)
    }

    /// Build a schema from explicit tables.
    ///
    /// # Errors
    ///
    /// Rejects duplicate field names, rules naming undeclared fields,
    /// extractions outside an 8-byte payload, a field written by two
    /// identifiers, and two rules for one identifier.
    pub fn from_tables(
        version: SchemaVersion,
        fields: &'static [&'static str],
        rules: &[RuleDef],
    ) -> Result<Self, SchemaError> {
        let mut by_name = HashMap::with_capacity(fields.len());
        for (index, &name) in fields.iter().enumerate() {
            let id = FieldId::from_index(index)
                .ok_or_else(|| SchemaError::DuplicateField(name.to_string()))?;
            if by_name.insert(name, id).is_some() {
                return Err(SchemaError::DuplicateField(name.to_string()));
            }
        }

        let mut owners: Vec<Option<u32>> = vec![None; fields.len()];
        let mut compiled: Vec<CompiledRule> = Vec::with_capacity(rules.len());

        for rule in rules {
            if compiled.iter().any(|c| c.bus_id == rule.bus_id) {
                return Err(SchemaError::DuplicateRule(rule.bus_id));
            }
            let mut resolved = Vec::with_capacity(rule.fields.len());
            for field in rule.fields {
                let id = by_name
                    .get(field.field)
                    .copied()
                    .ok_or_else(|| SchemaError::UnknownField {
                        bus_id: rule.bus_id,
                        field: field.field.to_string(),
                    })?;
                if !field.extract.fits_payload() {
                    return Err(SchemaError::ExtractionOutOfRange {
                        bus_id: rule.bus_id,
                        field: field.field.to_string(),
                    });
                }
                if let Some(owner) = owners.get_mut(id.index()) {
                    if let Some(first) = *owner {
                        return Err(SchemaError::OverlappingField {
                            field: field.field.to_string(),
                            first,
                            second: rule.bus_id,
                        });
                    }
                    *owner = Some(rule.bus_id);
                }
                resolved.push((id, field.extract));
            }
            compiled.push(CompiledRule {
                bus_id: rule.bus_id,
                fields: resolved,
            });
        }
        compiled.sort_by_key(|c| c.bus_id);

        Ok(Self {
            version,
            fields,
            rules: compiled,
            owners,
            by_name,
        })
    }

    /// Version this schema was built for.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Field names in schema order.
    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve a field name.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.by_name.get(name).copied()
    }

    /// Name of a field.
    pub fn field_name(&self, id: FieldId) -> Option<&'static str> {
        self.fields.get(id.index()).copied()
    }

    /// Bus identifier that writes a field, if any.
    pub fn owner(&self, id: FieldId) -> Option<u32> {
        self.owners.get(id.index()).copied().flatten()
    }

    /// Identifiers with a rule, ascending.
    pub fn bus_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.rules.iter().map(|r| r.bus_id)
    }

    /// Whether `bus_id` has a rule in this schema.
    pub fn recognizes(&self, bus_id: u32) -> bool {
        self.rule(bus_id).is_some()
    }

    fn rule(&self, bus_id: u32) -> Option<&CompiledRule> {
        self.rules
            .binary_search_by_key(&bus_id, |r| r.bus_id)
            .ok()
            .and_then(|i| self.rules.get(i))
    }

    /// Apply the rule for `bus_id` to `payload`.
    ///
    /// Returns `None` for identifiers without a rule. Fields the payload is
    /// too short for are counted in [`RuleOutput::skipped`] and left out.
    pub fn decode(&self, bus_id: u32, payload: &[u8]) -> Option<RuleOutput> {
        let rule = self.rule(bus_id)?;
        let mut out = RuleOutput {
            values: Vec::with_capacity(rule.fields.len()),
            skipped: 0,
        };
        for (id, extract) in &rule.fields {
            match extract.decode(payload) {
                Some(value) => out.values.push((*id, value)),
                None => out.skipped = out.skipped.saturating_add(1),
            }
        }
        Some(out)
    }
}
