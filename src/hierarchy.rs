//! Class-hierarchy loading and subsumption inference.
//!
//! Hierarchy files are configured as a flat token list consumed three
//! entries at a time: (file path, character encoding, base URI). Each
//! triple is parsed independently and merged into one directed graph.
//! Type-based
//! scoring queries the graph transitively: an annotator reporting
//! `SportsTeam` and a gold standard saying `Organisation` agree when the
//! hierarchy connects the two.

use oxrdf::NamedNode;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::path::Path;

use crate::error::HierarchyError;

const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";

/// Answers subsumption queries over the loaded class hierarchy.
///
/// Nodes are class URIs, edges read "is subclass of". The graph is built
/// once at startup and queried read-only afterwards, so it is shared
/// across workers without locking.
#[derive(Debug, Default)]
pub struct SubClassInferencer {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl SubClassInferencer {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, class: &str) -> NodeIndex {
        match self.index.get(class) {
            Some(&idx) => idx,
            None => {
                let idx = self.graph.add_node(class.to_owned());
                self.index.insert(class.to_owned(), idx);
                idx
            }
        }
    }

    /// Record `sub` as a subclass of `sup`. Repeated statements are
    /// idempotent.
    pub fn add_sub_class(&mut self, sub: &str, sup: &str) {
        let sub = self.node(sub);
        let sup = self.node(sup);
        if self.graph.find_edge(sub, sup).is_none() {
            self.graph.add_edge(sub, sup, ());
        }
    }

    /// Record two classes as equivalent (mutual subclass edges).
    pub fn add_equivalent(&mut self, a: &str, b: &str) {
        self.add_sub_class(a, b);
        self.add_sub_class(b, a);
    }

    /// Is `sub` a (direct or indirect) subclass of `sup`? Reflexively true
    /// when both are the same URI.
    pub fn is_sub_class_of(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        self.is_proper_sub_class_of(sub, sup)
    }

    /// Like [`is_sub_class_of`](Self::is_sub_class_of) but excluding the
    /// reflexive case: an actual edge path is required.
    pub fn is_proper_sub_class_of(&self, sub: &str, sup: &str) -> bool {
        let (Some(&sub), Some(&sup)) = (self.index.get(sub), self.index.get(sup)) else {
            return false;
        };
        has_path_connecting(&self.graph, sub, sup, None)
    }

    pub fn class_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn statement_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Loads hierarchy files into a [`SubClassInferencer`].
#[derive(Debug, Default)]
pub struct ClassHierarchyLoader;

impl ClassHierarchyLoader {
    pub fn new() -> Self {
        Self
    }

    /// Consume the flat configuration token list as (path, encoding, base
    /// URI) triples. A failing triple is logged and skipped; the remaining
    /// triples still load. An empty hierarchy is a valid end state.
    pub fn load_all(&self, tokens: &[String]) -> SubClassInferencer {
        let mut inferencer = SubClassInferencer::new();

        for triple in tokens.chunks(3) {
            let [path, encoding, base] = triple else {
                let e = HierarchyError::IncompleteTriple(triple.to_vec());
                tracing::warn!("{e}");
                continue;
            };
            if let Err(e) = self.load_file(path, encoding, base, &mut inferencer) {
                tracing::error!(
                    "Could not load the class hierarchy from {path:?} encoded with \
                     {encoding:?} using base URI {base:?}: {e}"
                );
            }
        }

        tracing::info!(
            "Class hierarchy loaded: {} classes, {} statements",
            inferencer.class_count(),
            inferencer.statement_count()
        );
        inferencer
    }

    /// Load one hierarchy file into the shared graph.
    pub fn load_file(
        &self,
        path: &str,
        encoding: &str,
        base: &str,
        inferencer: &mut SubClassInferencer,
    ) -> Result<(), HierarchyError> {
        let bytes = std::fs::read(Path::new(path)).map_err(|source| HierarchyError::ReadFile {
            path: path.to_owned(),
            source,
        })?;
        let content = decode(&bytes, encoding, path)?;

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((sub, predicate, obj)) = parse_statement(line, base, path, number + 1)? {
                match predicate.as_str() {
                    RDFS_SUB_CLASS_OF => inferencer.add_sub_class(&sub, &obj),
                    OWL_EQUIVALENT_CLASS => inferencer.add_equivalent(&sub, &obj),
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

fn decode(bytes: &[u8], encoding: &str, path: &str) -> Result<String, HierarchyError> {
    match encoding.to_ascii_uppercase().as_str() {
        "UTF-8" | "UTF8" | "US-ASCII" | "ASCII" => String::from_utf8(bytes.to_vec())
            .map_err(|_| HierarchyError::Decode {
                path: path.to_owned(),
                encoding: encoding.to_owned(),
            }),
        "ISO-8859-1" | "ISO8859-1" | "LATIN-1" | "LATIN1" => {
            Ok(bytes.iter().map(|&b| b as char).collect())
        }
        _ => Err(HierarchyError::UnsupportedEncoding {
            path: path.to_owned(),
            encoding: encoding.to_owned(),
        }),
    }
}

/// Parse one N-Triples-style statement line. Statements whose object is a
/// literal are skipped (`Ok(None)`).
fn parse_statement(
    line: &str,
    base: &str,
    path: &str,
    number: usize,
) -> Result<Option<(String, String, String)>, HierarchyError> {
    let malformed = |reason: &str| HierarchyError::ParseStatement {
        path: path.to_owned(),
        line: number,
        reason: reason.to_owned(),
    };

    let body = line
        .strip_suffix('.')
        .ok_or_else(|| malformed("missing terminating '.'"))?
        .trim();

    let (subject, rest) = take_iri_ref(body).ok_or_else(|| malformed("expected subject IRI"))?;
    let (predicate, rest) =
        take_iri_ref(rest.trim_start()).ok_or_else(|| malformed("expected predicate IRI"))?;

    let object = rest.trim();
    if object.starts_with('"') {
        return Ok(None);
    }
    let (object, trailing) = take_iri_ref(object).ok_or_else(|| malformed("expected object IRI"))?;
    if !trailing.trim().is_empty() {
        return Err(malformed("unexpected trailing tokens"));
    }

    let subject = resolve_iri(subject, base).ok_or_else(|| malformed("invalid subject IRI"))?;
    let predicate = resolve_iri(predicate, base).ok_or_else(|| malformed("invalid predicate IRI"))?;
    let object = resolve_iri(object, base).ok_or_else(|| malformed("invalid object IRI"))?;

    Ok(Some((subject, predicate, object)))
}

/// Split a leading `<...>` IRI reference off the input.
fn take_iri_ref(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix('<')?;
    let end = rest.find('>')?;
    Some((&rest[..end], &rest[end + 1..]))
}

/// Resolve a (possibly relative) IRI reference against the base URI and
/// validate the result.
fn resolve_iri(reference: &str, base: &str) -> Option<String> {
    let absolute = if reference.contains(':') {
        reference.to_owned()
    } else {
        format!("{base}{reference}")
    };
    NamedNode::new(absolute).ok().map(NamedNode::into_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_transitive_closure() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "hierarchy.nt",
            "<http://example.org/A> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/B> .\n\
             <http://example.org/B> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/C> .\n",
        );

        let loader = ClassHierarchyLoader::new();
        let inferencer =
            loader.load_all(&[path, "UTF-8".into(), "http://example.org/".into()]);

        assert!(inferencer.is_sub_class_of("http://example.org/A", "http://example.org/C"));
        assert!(!inferencer.is_sub_class_of("http://example.org/C", "http://example.org/A"));
    }

    #[test]
    fn test_reflexive_by_convention() {
        let inferencer = SubClassInferencer::new();
        assert!(inferencer.is_sub_class_of("http://example.org/A", "http://example.org/A"));
        assert!(!inferencer.is_proper_sub_class_of("http://example.org/A", "http://example.org/A"));
    }

    #[test]
    fn test_equivalent_classes_subsume_both_ways() {
        let mut inferencer = SubClassInferencer::new();
        inferencer.add_equivalent("http://example.org/A", "http://example.org/B");
        inferencer.add_sub_class("http://example.org/B", "http://example.org/C");

        assert!(inferencer.is_sub_class_of("http://example.org/A", "http://example.org/C"));
        assert!(inferencer.is_sub_class_of("http://example.org/B", "http://example.org/A"));
    }

    #[test]
    fn test_duplicate_statements_are_idempotent() {
        let mut inferencer = SubClassInferencer::new();
        inferencer.add_sub_class("http://example.org/A", "http://example.org/B");
        inferencer.add_sub_class("http://example.org/A", "http://example.org/B");
        assert_eq!(inferencer.statement_count(), 1);
    }

    #[test]
    fn test_unreadable_file_does_not_block_others() {
        let dir = TempDir::new().unwrap();
        let good = write_file(
            &dir,
            "good.nt",
            "<http://example.org/A> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/B> .\n",
        );

        let loader = ClassHierarchyLoader::new();
        let inferencer = loader.load_all(&[
            dir.path().join("missing.nt").display().to_string(),
            "UTF-8".into(),
            "http://example.org/".into(),
            good,
            "UTF-8".into(),
            "http://example.org/".into(),
        ]);

        assert!(inferencer.is_sub_class_of("http://example.org/A", "http://example.org/B"));
    }

    #[test]
    fn test_relative_iris_resolve_against_base() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "relative.nt",
            "<A> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <B> .\n",
        );

        let loader = ClassHierarchyLoader::new();
        let inferencer =
            loader.load_all(&[path, "UTF-8".into(), "http://example.org/onto/".into()]);

        assert!(
            inferencer.is_sub_class_of("http://example.org/onto/A", "http://example.org/onto/B")
        );
    }

    #[test]
    fn test_latin1_decoding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.nt");
        let mut file = std::fs::File::create(&path).unwrap();
        // "Gemüse" in ISO-8859-1: 0xFC for ü, invalid as UTF-8.
        file.write_all(b"<Gem\xfcse> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <Pflanze> .\n")
            .unwrap();

        let loader = ClassHierarchyLoader::new();
        let inferencer = loader.load_all(&[
            path.display().to_string(),
            "ISO-8859-1".into(),
            "http://example.org/".into(),
        ]);

        assert!(inferencer
            .is_sub_class_of("http://example.org/Gem\u{fc}se", "http://example.org/Pflanze"));
    }

    #[test]
    fn test_unsupported_encoding_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "utf16.nt",
            "<http://example.org/A> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/B> .\n",
        );

        let loader = ClassHierarchyLoader::new();
        let inferencer =
            loader.load_all(&[path, "UTF-16".into(), "http://example.org/".into()]);
        assert_eq!(inferencer.class_count(), 0);
    }

    #[test]
    fn test_literal_objects_are_skipped() {
        let result = parse_statement(
            "<http://example.org/A> <http://www.w3.org/2000/01/rdf-schema#label> \"Class A\" .",
            "http://example.org/",
            "test.nt",
            1,
        );
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_malformed_statement_is_an_error() {
        let result = parse_statement(
            "<http://example.org/A> no angle brackets here .",
            "http://example.org/",
            "test.nt",
            1,
        );
        assert!(result.is_err());
    }
}
