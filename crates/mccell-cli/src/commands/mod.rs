//! CLI command handlers
//!
//! # Modules
//!
//! - `snapshot`: OBO → JSON snapshot
//! - `subdag`: leaf / internal listing below a root
//! - `catalog`: signed-index term catalog
//! - `compile`: label column → compiled bundle
//!
//! Every handler returns the process exit code: 0 on success, 1 on error.

pub mod catalog;
pub mod compile;
pub mod snapshot;
pub mod subdag;

use mccell_ontology::OntologyResult;
use tracing::error;

/// Log a failed command and map it to an exit code.
pub(crate) fn exit_code(command: &str, result: OntologyResult<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{} failed: {}", command, e);
            1
        }
    }
}

/// Write `content` to `path`, or to stdout when no path is given.
pub(crate) fn write_output(path: Option<&std::path::Path>, content: &str) -> OntologyResult<()> {
    use std::io::Write;

    match path {
        Some(path) => std::fs::write(path, content)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
