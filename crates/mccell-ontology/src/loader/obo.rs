//! OBO 1.4 parser for Cell Ontology releases (`cl.obo`, `cl-basic.obo`).
//!
//! Only what the term graph needs is read:
//!
//! ```obo
//! [Term]
//! id: CL:0000542
//! name: lymphocyte
//! is_a: CL:0000842 ! mononuclear leukocyte
//! ```
//!
//! Supported tags: `id`, `name`, `is_a`, `is_obsolete`. Other tags are
//! ignored. `[Typedef]` / `[Instance]` stanzas and the header are skipped.
//! Obsolete terms are dropped together with their edges.

use std::path::Path;

use crate::error::{OntologyError, OntologyResult};
use crate::graph::{OntologyGraph, OntologyGraphBuilder};

#[derive(Debug, Default)]
struct StanzaBuilder {
    id: Option<String>,
    name: Option<String>,
    is_a: Vec<String>,
    is_obsolete: bool,
    start_line: usize,
}

impl StanzaBuilder {
    fn at(line: usize) -> Self {
        Self {
            start_line: line,
            ..Default::default()
        }
    }

    fn finish(self, graph: &mut OntologyGraphBuilder) -> OntologyResult<()> {
        let id = self.id.ok_or(OntologyError::OboParse {
            line: self.start_line,
            message: "[Term] stanza without id".to_string(),
        })?;

        if self.is_obsolete {
            tracing::trace!(term = %id, "Skipping obsolete term");
            return Ok(());
        }

        graph.add_term(id.clone(), self.name.unwrap_or_default())?;
        for parent in self.is_a {
            graph.add_is_a(id.clone(), parent);
        }
        Ok(())
    }
}

/// Parse OBO text into an ontology graph.
///
/// # Errors
/// - `OboParse` for a tag line without `:` or a `[Term]` without `id`
/// - `DuplicateTerm` / `CycleDetected` from graph construction
pub fn parse_obo(content: &str) -> OntologyResult<OntologyGraph> {
    let mut graph = OntologyGraphBuilder::new();
    let mut current: Option<StanzaBuilder> = None;

    for (line_no, raw) in content.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('!') {
            continue;
        }

        if line.starts_with('[') {
            if let Some(stanza) = current.take() {
                stanza.finish(&mut graph)?;
            }
            if line == "[Term]" {
                current = Some(StanzaBuilder::at(line_no));
            }
            continue;
        }

        let Some(stanza) = current.as_mut() else {
            // Header or non-Term stanza
            continue;
        };

        let (tag, value) = line.split_once(':').ok_or_else(|| OntologyError::OboParse {
            line: line_no,
            message: format!("expected 'tag: value', got '{line}'"),
        })?;
        let value = strip_trailing(value.trim());

        match tag.trim() {
            "id" => stanza.id = Some(value.to_string()),
            "name" => stanza.name = Some(value.to_string()),
            "is_a" => {
                // is_a values may carry qualifiers: "CL:1 {source=...}"
                if let Some(parent) = value.split_whitespace().next() {
                    stanza.is_a.push(parent.to_string());
                }
            }
            "is_obsolete" => stanza.is_obsolete = value == "true",
            _ => {}
        }
    }

    if let Some(stanza) = current.take() {
        stanza.finish(&mut graph)?;
    }

    tracing::info!(terms = graph.term_count(), "Parsed OBO ontology");
    graph.build()
}

/// Read and parse an OBO file.
pub fn load_obo_file(path: impl AsRef<Path>) -> OntologyResult<OntologyGraph> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_obo(&content)
}

/// Drop a trailing `! comment`, keeping `!` inside quoted strings.
fn strip_trailing(value: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, ch) in value.char_indices() {
        match ch {
            '\\' if !escaped => {
                escaped = true;
                continue;
            }
            '"' if !escaped => in_quotes = !in_quotes,
            '!' if !in_quotes => return value[..i].trim_end(),
            _ => {}
        }
        escaped = false;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"format-version: 1.2
ontology: cl

[Term]
id: CL:0000000
name: cell

[Term]
id: CL:0000988
name: hematopoietic cell
is_a: CL:0000000 ! cell

[Term]
id: CL:0000542
name: lymphocyte
def: "A lymphocyte! with punctuation" [GOC:add]
is_a: CL:0000988 {source="GOC"} ! hematopoietic cell
relationship: part_of UBERON:0002390

[Term]
id: CL:0000001
name: obsolete thing
is_obsolete: true
is_a: CL:0000000

[Typedef]
id: part_of
name: part of
is_transitive: true
"#;

    #[test]
    fn test_parse_sample() {
        let graph = parse_obo(SAMPLE).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.name("CL:0000542").unwrap(), "lymphocyte");
        assert_eq!(
            graph.direct_superclasses("CL:0000542").unwrap(),
            vec!["CL:0000988"]
        );
        assert_eq!(
            graph.superclasses("CL:0000542", false).unwrap(),
            vec!["CL:0000000", "CL:0000988"]
        );
    }

    #[test]
    fn test_obsolete_terms_dropped() {
        let graph = parse_obo(SAMPLE).unwrap();
        assert!(!graph.contains("CL:0000001"));
        assert!(graph.contains("CL:0000000"));
    }

    #[test]
    fn test_typedef_ignored() {
        let graph = parse_obo(SAMPLE).unwrap();
        assert!(!graph.contains("part_of"));
    }

    #[test]
    fn test_term_without_id_is_error() {
        let err = parse_obo("[Term]\nname: anonymous\n").unwrap_err();
        assert!(matches!(err, OntologyError::OboParse { line: 1, .. }));
    }

    #[test]
    fn test_malformed_line_is_error() {
        let err = parse_obo("[Term]\nid: CL:1\nthis line has no colon\n").unwrap_err();
        assert!(matches!(err, OntologyError::OboParse { line: 3, .. }));
    }

    #[test]
    fn test_strip_trailing_comment() {
        assert_eq!(strip_trailing("CL:1 ! cell"), "CL:1");
        assert_eq!(strip_trailing("\"a ! b\" [x]"), "\"a ! b\" [x]");
        assert_eq!(strip_trailing("plain"), "plain");
    }

    #[test]
    fn test_load_obo_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cl.obo");
        std::fs::write(&path, SAMPLE).unwrap();

        let graph = load_obo_file(&path).unwrap();
        assert_eq!(graph.len(), 3);
    }
}
