//! Knowledge-base membership classification.
//!
//! Decides whether a URI (or any member of an equivalence set) belongs to
//! one of the configured well-known knowledge bases. Membership testing is
//! a prefix match of the canonicalized URI against the whitelist, anchored
//! at position 0, so a KB-looking path buried inside an unrelated URI
//! never matches.

use crate::meaning::Meaning;

/// Whitelist-based KB classifier.
///
/// Descriptors are canonicalized namespace prefixes such as
/// `dbpedia.org/resource/`; the list is built once from configuration and
/// shared read-only.
#[derive(Debug, Clone)]
pub struct KbClassifier {
    descriptors: Vec<String>,
}

impl KbClassifier {
    pub fn new(descriptors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            descriptors: descriptors.into_iter().map(Into::into).collect(),
        }
    }

    /// True iff any URI of the meaning belongs to a known KB. An empty
    /// meaning is not known.
    pub fn is_known_kb(&self, meaning: &Meaning) -> bool {
        meaning.iter().any(|uri| self.is_known_uri(uri))
    }

    /// True iff the single URI belongs to a known KB.
    pub fn is_known_uri(&self, uri: &str) -> bool {
        let canonical = canonicalize(uri);
        self.descriptors
            .iter()
            .any(|descriptor| canonical.starts_with(descriptor.as_str()))
    }
}

/// Canonicalize a URI for whitelist comparison: drop the scheme, then strip
/// at most one leading subdomain label. A label is only stripped when the
/// authority has more than two dot-separated labels, so a bare registrable
/// domain (`dbpedia.org`) stays unchanged while `en.dbpedia.org` loses its
/// language prefix. The path is passed through byte for byte.
fn canonicalize(uri: &str) -> &str {
    let stripped = uri
        .strip_prefix("http://")
        .or_else(|| uri.strip_prefix("https://"))
        .unwrap_or(uri);

    let authority = stripped.split('/').next().unwrap_or(stripped);
    if authority.split('.').count() > 2 {
        if let Some((_, rest)) = stripped.split_once('.') {
            if !rest.is_empty() {
                return rest;
            }
        }
    }
    stripped
}
