//! Sub-DAG command: leaf and internal nodes below a root term.

use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use mccell_ontology::{load_ontology, OntologyResult, HEMATOPOIETIC_CELL};

use super::{exit_code, write_output};

/// Arguments for the subdag command.
#[derive(Args, Debug)]
pub struct SubdagArgs {
    /// Ontology file (.obo, or .json snapshot)
    #[arg(long)]
    pub ontology: PathBuf,

    /// Root term of the sub-DAG
    #[arg(long, default_value = HEMATOPOIETIC_CELL)]
    pub root: String,

    /// Write JSON here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn handle_subdag(args: SubdagArgs) -> i32 {
    exit_code("subdag", run(&args))
}

fn run(args: &SubdagArgs) -> OntologyResult<()> {
    let graph = load_ontology(&args.ontology)?;
    let nodes = graph.sub_dag(&args.root);
    if nodes.is_empty() {
        warn!(root = %args.root, "Sub-DAG is empty");
    }
    let (leaves, internal) = graph.classify_within(&nodes);

    let report = serde_json::json!({
        "root": args.root,
        "leaves": leaves,
        "internal": internal,
    });
    let mut content = serde_json::to_string_pretty(&report)?;
    content.push('\n');
    write_output(args.out.as_deref(), &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdag_report() {
        let dir = tempfile::tempdir().unwrap();
        let obo = dir.path().join("cl.obo");
        let out = dir.path().join("subdag.json");
        std::fs::write(
            &obo,
            "[Term]\nid: CL:0000000\n\n[Term]\nid: CL:0000988\nis_a: CL:0000000\n\n\
             [Term]\nid: CL:0000542\nis_a: CL:0000988\n",
        )
        .unwrap();

        let code = handle_subdag(SubdagArgs {
            ontology: obo,
            root: HEMATOPOIETIC_CELL.to_string(),
            out: Some(out.clone()),
        });
        assert_eq!(code, 0);

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(report["leaves"], serde_json::json!(["CL:0000542"]));
        assert_eq!(report["internal"], serde_json::json!(["CL:0000988"]));
    }
}
