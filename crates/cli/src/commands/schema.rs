//! Schema inspection command.

use anyhow::Result;
use colored::*;
use serde::Serialize;
use trackside_telemetry_schema::{Schema, SchemaVersion, ids};

use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct FieldRow {
    index: usize,
    name: &'static str,
    bus_id: Option<u32>,
    source: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct SchemaSummary {
    schema: SchemaVersion,
    fields: Vec<FieldRow>,
    bus_ids: Vec<u32>,
}

/// Execute schema command.
pub async fn execute(version: SchemaVersion, json: bool) -> Result<()> {
    let schema = Schema::new(version).map_err(CliError::from)?;
    let summary = summarize(&schema);

    if json {
        output::print_json(&summary)?;
        return Ok(());
    }

    println!(
        "{} {} ({} fields)",
        "Schema".bold(),
        summary.schema.to_string().cyan(),
        summary.fields.len()
    );
    for row in &summary.fields {
        let owner = match (row.bus_id, row.source) {
            (Some(id), Some(source)) => format!("{id:#05x} {source}"),
            (Some(id), None) => format!("{id:#05x}"),
            _ => "unassigned".to_string(),
        };
        println!("  {:>2}  {:<22} {}", row.index, row.name, owner.dimmed());
    }

    let ignored: Vec<String> = ids::ALL
        .into_iter()
        .filter(|id| !summary.bus_ids.contains(id))
        .map(|id| format!("{id:#05x}"))
        .collect();
    if !ignored.is_empty() {
        println!("  {} {}", "Ignored bus ids:".yellow(), ignored.join(", "));
    }
    Ok(())
}

fn summarize(schema: &Schema) -> SchemaSummary {
    let fields = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(index, &name)| {
            let bus_id = schema.field_id(name).and_then(|id| schema.owner(id));
            FieldRow {
                index,
                name,
                bus_id,
                source: bus_id.and_then(ids::role_name),
            }
        })
        .collect();

    SchemaSummary {
        schema: schema.version(),
        fields,
        bus_ids: schema.bus_ids().collect(),
    }
}
