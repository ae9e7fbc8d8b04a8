//! Snapshot command: parse an ontology once, reload it cheaply later.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use mccell_ontology::{load_ontology, OntologyResult, OntologySnapshot};

use super::exit_code;

/// Arguments for the snapshot command.
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Ontology file (.obo, or .json snapshot)
    #[arg(long)]
    pub ontology: PathBuf,

    /// Output snapshot path
    #[arg(long)]
    pub out: PathBuf,
}

pub fn handle_snapshot(args: SnapshotArgs) -> i32 {
    exit_code("snapshot", run(&args))
}

fn run(args: &SnapshotArgs) -> OntologyResult<()> {
    let graph = load_ontology(&args.ontology)?;
    OntologySnapshot::from_graph(&graph).save_json(&args.out)?;
    info!(
        terms = graph.len(),
        out = %args.out.display(),
        "Snapshot written"
    );
    Ok(())
}
