//! The accumulating equivalence set for one entity mention.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Verdict of the entity-existence check for a [`Meaning`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Existence {
    /// No registered checker covered any URI of the meaning.
    #[default]
    Unverified,
    /// At least one URI was confirmed to denote a real entity.
    Exists,
    /// Every checkable URI was confirmed absent.
    Missing,
}

/// A growable set of URIs believed to denote the same real-world entity.
///
/// URIs are compared by exact string; the set only grows while resolution
/// proceeds. The existence mark is a side effect of
/// [`EntityCheckerManager::check_meanings`](crate::check::EntityCheckerManager::check_meanings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    uris: BTreeSet<String>,
    existence: Existence,
}

impl Meaning {
    /// Create a meaning holding a single URI.
    pub fn new(uri: impl Into<String>) -> Self {
        let mut uris = BTreeSet::new();
        uris.insert(uri.into());
        Self {
            uris,
            existence: Existence::Unverified,
        }
    }

    /// Add an equivalent URI. Returns `true` if it was not present yet.
    pub fn insert(&mut self, uri: impl Into<String>) -> bool {
        self.uris.insert(uri.into())
    }

    /// Merge another equivalence set into this one.
    pub fn merge(&mut self, uris: impl IntoIterator<Item = String>) {
        self.uris.extend(uris);
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.uris.contains(uri)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.uris.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    pub fn uris(&self) -> &BTreeSet<String> {
        &self.uris
    }

    pub fn existence(&self) -> Existence {
        self.existence
    }

    pub fn set_existence(&mut self, existence: Existence) {
        self.existence = existence;
    }
}

impl FromIterator<String> for Meaning {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            uris: iter.into_iter().collect(),
            existence: Existence::Unverified,
        }
    }
}

impl From<BTreeSet<String>> for Meaning {
    fn from(uris: BTreeSet<String>) -> Self {
        Self {
            uris,
            existence: Existence::Unverified,
        }
    }
}

/// Extract the authority component of a URI: the text between the scheme's
/// `//` and the following `/`. Returns `None` when the URI has no scheme
/// separator or an empty authority.
pub fn domain_of(uri: &str) -> Option<&str> {
    let rest = uri.split_once("://").map(|(_, r)| r)?;
    let domain = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}
