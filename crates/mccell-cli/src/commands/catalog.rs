//! Catalog command: signed-index term metadata as JSON lines.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use mccell_ontology::{build_catalog, load_ontology, OntologyResult};

use super::{exit_code, write_output};

/// Arguments for the catalog command.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Ontology file (.obo, or .json snapshot)
    #[arg(long)]
    pub ontology: PathBuf,

    /// Only CL terms
    #[arg(long)]
    pub cl_only: bool,

    /// Write JSON lines here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn handle_catalog(args: CatalogArgs) -> i32 {
    exit_code("catalog", run(&args))
}

fn run(args: &CatalogArgs) -> OntologyResult<()> {
    let graph = load_ontology(&args.ontology)?;
    let catalog = build_catalog(&graph, args.cl_only);

    let mut content = String::new();
    for row in &catalog {
        content.push_str(&serde_json::to_string(row)?);
        content.push('\n');
    }
    write_output(args.out.as_deref(), &content)?;

    info!(terms = catalog.len(), cl_only = args.cl_only, "Catalog written");
    Ok(())
}
