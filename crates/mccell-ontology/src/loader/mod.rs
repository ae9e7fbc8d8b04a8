//! Ontology sources.
//!
//! - [`obo`]: OBO text (`cl.obo`)
//! - [`snapshot`]: JSON snapshot written by a previous run
//!
//! [`load_ontology`] picks the format from the file extension. The returned
//! graph is an explicit handle: callers pass it to the compiler, nothing is
//! cached process-wide.

pub mod obo;
pub mod snapshot;

use std::path::Path;

use crate::error::OntologyResult;
use crate::graph::OntologyGraph;

pub use obo::{load_obo_file, parse_obo};
pub use snapshot::{OntologySnapshot, SnapshotTerm, SNAPSHOT_FORMAT_VERSION};

/// Load an ontology from `.json` (snapshot) or any other extension (OBO).
pub fn load_ontology(path: impl AsRef<Path>) -> OntologyResult<OntologyGraph> {
    let path = path.as_ref();
    let is_snapshot = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    tracing::info!(path = %path.display(), snapshot = is_snapshot, "Loading ontology");

    if is_snapshot {
        OntologySnapshot::load_json(path)?.into_graph()
    } else {
        load_obo_file(path)
    }
}
