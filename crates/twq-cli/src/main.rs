//! twq CLI entrypoint.
//!
//! Composes Twitter API v2 field and expansion parameters from the command
//! line:
//! - `twq query` - Build the query parameters for one request
//! - `twq catalogue` - List optional fields and expansion relations

#![forbid(unsafe_code)]

mod catalogue;
mod query;

use clap::{Parser, Subcommand};

/// Field-selection and expansion composer for the Twitter API v2.
#[derive(Parser)]
#[command(name = "twq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose query parameters.
    ///
    /// Validates every field and relation token against the entity catalogues
    /// and prints the parameters in the order the API expects.
    ///
    /// Example: twq query --entity user --fields created_at --expand pinned_tweet_id=lang
    Query(query::QueryArgs),

    /// Show the field and relation catalogues.
    Catalogue(catalogue::CatalogueArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries the composed parameters.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query(args) => query::run(&args),
        Commands::Catalogue(args) => catalogue::run(&args),
    }
}
