//! `twq catalogue` command implementation.
//!
//! Lists each entity type's optional fields and expansion relations, in the
//! order they are emitted on the wire.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use twq_core::{EntityType, RelationDescriptor};

/// Arguments for the `twq catalogue` command.
#[derive(Args, Debug)]
pub struct CatalogueArgs {
    /// Only show this entity type.
    #[arg(long, short = 'e')]
    pub entity: Option<EntityType>,

    /// Output JSON instead of human-readable format.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Catalogue listing for one entity type.
#[derive(Debug, Serialize)]
struct CatalogueEntry {
    entity: EntityType,
    fields_parameter: &'static str,
    includes_key: &'static str,
    fields: &'static [&'static str],
    relations: &'static [RelationDescriptor],
}

impl From<EntityType> for CatalogueEntry {
    fn from(entity: EntityType) -> Self {
        Self {
            entity,
            fields_parameter: entity.fields_parameter(),
            includes_key: entity.includes_key(),
            fields: entity.field_names(),
            relations: entity.relations(),
        }
    }
}

/// Run the catalogue command.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run(args: &CatalogueArgs) -> Result<()> {
    let entries: Vec<CatalogueEntry> = args
        .entity
        .map_or_else(|| EntityType::ALL.to_vec(), |entity| vec![entity])
        .into_iter()
        .map(CatalogueEntry::from)
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&entries, args.json, &mut out)?;
    out.flush()?;
    Ok(())
}

fn render(entries: &[CatalogueEntry], json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, entries)?;
        writeln!(out)?;
        return Ok(());
    }

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{} ({})", entry.entity, entry.fields_parameter)?;
        writeln!(out, "  fields: {}", entry.fields.join(", "))?;
        if entry.relations.is_empty() {
            writeln!(out, "  expansions: (none)")?;
        } else {
            writeln!(out, "  expansions:")?;
            for rel in entry.relations {
                writeln!(out, "    {} -> {}", rel.token, rel.target)?;
            }
        }
    }
    Ok(())
}
