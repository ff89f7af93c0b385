//! Repair of malformed percent-encoding in URIs.

use async_trait::async_trait;
use std::collections::BTreeSet;

use super::{singleton, SameAsRetriever};

/// Static fallback strategy: fixes URIs whose percent-encoding is broken.
///
/// Annotation systems occasionally emit URIs containing a raw `%` that is
/// not the start of a valid escape sequence (e.g. `...%_of_GDP`). Such a
/// URI can never match its correctly encoded counterpart, so the repaired
/// form (`%` re-encoded as `%25`) is reported as an equivalent. URIs that
/// are already well formed pass through untouched.
#[derive(Default)]
pub struct ErrorFixingRetriever;

impl ErrorFixingRetriever {
    pub fn new() -> Self {
        Self
    }

    /// Re-encode every `%` that does not begin a two-digit hex escape.
    fn fix_percent_encoding(uri: &str) -> Option<String> {
        let bytes = uri.as_bytes();
        let mut fixed = String::with_capacity(uri.len());
        let mut changed = false;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'%' {
                let valid = i + 2 < bytes.len()
                    && bytes[i + 1].is_ascii_hexdigit()
                    && bytes[i + 2].is_ascii_hexdigit();
                if valid {
                    fixed.push('%');
                } else {
                    fixed.push_str("%25");
                    changed = true;
                }
                i += 1;
            } else {
                let ch = uri[i..].chars().next().unwrap_or('\u{FFFD}');
                fixed.push(ch);
                i += ch.len_utf8();
            }
        }

        changed.then_some(fixed)
    }
}

#[async_trait]
impl SameAsRetriever for ErrorFixingRetriever {
    async fn retrieve(&self, uri: &str) -> BTreeSet<String> {
        let mut set = singleton(uri);
        if let Some(fixed) = Self::fix_percent_encoding(uri) {
            tracing::debug!("Fixed malformed percent-encoding in {uri}");
            set.insert(fixed);
        }
        set
    }
}
