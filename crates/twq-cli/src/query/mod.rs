//! `twq query` command implementation.
//!
//! # Usage
//!
//! ```text
//! # name=value lines
//! twq query --entity tweet --fields lang,created_at --expand author_id=verified
//!
//! # From a selection document, with an extra parameter, as JSON
//! twq query --config selection.json --param max_results=10 --json
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use tracing::debug;
use twq_core::{
    Entity, EntityType, ExpansionEntry, Media, Place, Poll, QueryParameter, QueryParameters,
    QueryResult, SelectionConfig, Tweet, User,
};

/// Arguments for the `twq query` command.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Root entity type: user, tweet, media, poll or place.
    #[arg(long, short = 'e')]
    pub entity: Option<EntityType>,

    /// Optional fields of the root entity (comma-separated, repeatable).
    #[arg(long, short = 'f', value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Relation to expand, optionally with target fields: `rel` or `rel=f,g`.
    #[arg(long = "expand", short = 'x')]
    pub expansions: Vec<ExpansionEntry>,

    /// Extra `name=value` parameter, passed through after the selection.
    #[arg(long = "param", short = 'p')]
    pub parameters: Vec<QueryParameter>,

    /// Selection document (JSON) to start from.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Output JSON instead of `name=value` lines.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// One emitted parameter in JSON output.
#[derive(Debug, Serialize)]
struct ParameterLine<'a> {
    name: &'a str,
    value: String,
}

/// Run the query command.
///
/// # Errors
///
/// Returns an error if the selection document cannot be loaded or any token
/// is rejected by the catalogues.
pub fn run(args: &QueryArgs) -> Result<()> {
    let selection = selection_from_args(args)?;
    let params = compose(&selection, &args.parameters)
        .with_context(|| format!("failed to compose `{}` query", selection.entity))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&params, args.json, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Merge the selection document (if any) with the command-line selection.
fn selection_from_args(args: &QueryArgs) -> Result<SelectionConfig> {
    let mut selection = match (&args.config, args.entity) {
        (Some(path), entity) => {
            let loaded = SelectionConfig::from_path(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            if let Some(entity) = entity.filter(|e| *e != loaded.entity) {
                bail!(
                    "--entity {entity} conflicts with `{}` in {}",
                    loaded.entity,
                    path.display()
                );
            }
            debug!(path = %path.display(), entity = %loaded.entity, "loaded selection");
            loaded
        }
        (None, Some(entity)) => SelectionConfig::new(entity),
        (None, None) => bail!("either --entity or --config is required"),
    };

    let mut overlay = SelectionConfig::new(selection.entity);
    overlay.fields.clone_from(&args.fields);
    overlay.expansions.clone_from(&args.expansions);
    selection.merge(overlay)?;
    Ok(selection)
}

fn compose(selection: &SelectionConfig, extra: &[QueryParameter]) -> QueryResult<QueryParameters> {
    match selection.entity {
        EntityType::User => compose_typed::<User>(selection, extra),
        EntityType::Tweet => compose_typed::<Tweet>(selection, extra),
        EntityType::Media => compose_typed::<Media>(selection, extra),
        EntityType::Poll => compose_typed::<Poll>(selection, extra),
        EntityType::Place => compose_typed::<Place>(selection, extra),
    }
}

fn compose_typed<E: Entity>(
    selection: &SelectionConfig,
    extra: &[QueryParameter],
) -> QueryResult<QueryParameters> {
    let mut composer = selection.resolve::<E>()?;
    for param in extra {
        composer = composer.raw_parameter(param.clone())?;
    }
    composer.build()
}

fn render(params: &QueryParameters, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let lines: Vec<ParameterLine<'_>> = params
            .iter()
            .map(|p| ParameterLine {
                name: p.name(),
                value: p.value(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &lines)?;
        writeln!(out)?;
    } else {
        for param in params {
            writeln!(out, "{param}")?;
        }
    }
    Ok(())
}
