//! McCell CLI
//!
//! Offline preprocessing for hierarchical cell-type classification.
//!
//! # Commands
//!
//! - `snapshot`: Parse an OBO ontology once and save a JSON snapshot
//! - `subdag`: List leaf and internal nodes below a root term
//! - `catalog`: Signed-index term catalog as JSON lines
//! - `compile`: Build the loss bundle for a label column
//!
//! Logs go to stderr, results to stdout or `--out`.
//! Exit code 0 on success, 1 on any error.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

/// McCell - Cell Ontology preprocessing for hierarchical loss training
#[derive(Parser)]
#[command(name = "mccell")]
#[command(author = "McCell Team")]
#[command(version)]
#[command(about = "Cell Ontology preprocessing for hierarchical cell-type classification")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an ontology and save it as a JSON snapshot
    Snapshot(commands::snapshot::SnapshotArgs),
    /// Print the leaf and internal nodes of a sub-DAG
    Subdag(commands::subdag::SubdagArgs),
    /// Export the signed-index term catalog
    Catalog(commands::catalog::CatalogArgs),
    /// Compile relation matrices for a label column
    ///
    /// Reads one ground-truth label per line, filters rare labels and labels
    /// outside the root sub-DAG, and writes a validated bundle:
    ///   mccell compile --ontology cl.json --labels labels.txt \
    ///       --root CL:0000988 --min-count 5000 --cl-only \
    ///       --upper-limit CL:0000988 --out bundle.json
    Compile(commands::compile::CompileArgs),
}

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Commands::Snapshot(args) => commands::snapshot::handle_snapshot(args),
        Commands::Subdag(args) => commands::subdag::handle_subdag(args),
        Commands::Catalog(args) => commands::catalog::handle_catalog(args),
        Commands::Compile(args) => commands::compile::handle_compile(args),
    };

    std::process::exit(exit_code);
}
