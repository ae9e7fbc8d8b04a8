//! Compile command: label column → validated loss bundle.
//!
//! The label file holds one ground-truth term id per line (one line per
//! observation). Blank lines are ignored.

use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use mccell_ontology::{
    load_ontology, CompileConfig, CompiledBundle, OntologyResult, ParentAxis, WorkingLabelSet,
};

use super::{exit_code, write_output};

/// Arguments for the compile command.
#[derive(Args, Debug, Default)]
pub struct CompileArgs {
    /// Ontology file (.obo, or .json snapshot)
    #[arg(long)]
    pub ontology: PathBuf,

    /// Observed labels, one term id per line
    #[arg(long)]
    pub labels: PathBuf,

    /// JSON compile configuration; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Drop labels outside the sub-DAG of this term
    #[arg(long)]
    pub root: Option<String>,

    /// Keep labels observed strictly more than this many times
    #[arg(long, default_value_t = 0)]
    pub min_count: usize,

    /// Drop parent nodes above this term
    #[arg(long)]
    pub upper_limit: Option<String>,

    /// Only CL terms on the parent axis
    #[arg(long)]
    pub cl_only: bool,

    /// Use every ancestor of the working labels as the parent axis
    #[arg(long)]
    pub ancestor_closure: bool,

    /// Also put the working labels on an ancestor-closure axis
    #[arg(long)]
    pub include_leafs: bool,

    /// Bundle output path
    #[arg(long)]
    pub out: PathBuf,

    /// Write the JSON summary here instead of stdout
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

pub fn handle_compile(args: CompileArgs) -> i32 {
    exit_code("compile", run(&args))
}

/// Merge the optional config file with command-line overrides.
fn build_config(args: &CompileArgs) -> OntologyResult<CompileConfig> {
    let mut config = match &args.config {
        Some(path) => CompileConfig::from_json_file(path)?,
        None => CompileConfig::default(),
    };

    if let Some(limit) = &args.upper_limit {
        config.upper_limit = Some(limit.clone());
    }
    if args.cl_only {
        config.cl_only = true;
    }
    if args.ancestor_closure {
        config.parent_axis = ParentAxis::AncestorClosure;
    }
    if args.include_leafs {
        config.include_leafs = true;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &CompileArgs) -> OntologyResult<()> {
    let config = build_config(args)?;
    let graph = load_ontology(&args.ontology)?;

    let raw = std::fs::read_to_string(&args.labels)?;
    let observations = raw.lines().map(str::trim).filter(|line| !line.is_empty());
    let working =
        WorkingLabelSet::from_observations(observations, args.min_count, args.root.as_deref(), &graph);

    let bundle = mccell_ontology::compile(&graph, &working, config)?;
    if !bundle.diagnostics().is_clean() {
        warn!(diagnostics = ?bundle.diagnostics(), "Compile finished with diagnostics");
    }
    bundle.save_json(&args.out)?;

    let mut content = serde_json::to_string_pretty(&summary(&bundle))?;
    content.push('\n');
    write_output(args.summary.as_deref(), &content)?;

    info!(fingerprint = bundle.fingerprint(), "Compile complete");
    Ok(())
}

fn summary(bundle: &CompiledBundle) -> serde_json::Value {
    serde_json::json!({
        "labels": bundle.num_labels(),
        "leaves": bundle.num_leaves(),
        "internal": bundle.num_labels() - bundle.num_leaves(),
        "parents": bundle.num_parents(),
        "fingerprint": bundle.fingerprint(),
        "diagnostics": bundle.diagnostics(),
    })
}
