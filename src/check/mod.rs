//! Entity-existence checking.
//!
//! Gold-standard datasets and annotator output both contain URIs that no
//! longer dereference. Before scoring, each [`Meaning`] is probed against
//! the checker registered for its URIs' namespaces and marked with the
//! verdict; namespaces nobody registered for stay unverified.

mod http;

pub use http::HttpEntityChecker;

use async_trait::async_trait;
use std::sync::Arc;

use crate::meaning::{Existence, Meaning};

/// Capability of confirming that a URI denotes a real entity.
///
/// `None` means the check could not be carried out (timeout, transport
/// failure); failure to check is never treated as non-existence.
#[async_trait]
pub trait EntityChecker: Send + Sync {
    async fn exists(&self, uri: &str) -> Option<bool>;
}

/// Maps URI namespaces to registered checkers and applies them in batch.
///
/// One checker instance may be registered under many namespaces; the
/// registration list is built once at startup and read-only afterwards.
#[derive(Default)]
pub struct EntityCheckerManager {
    checkers: Vec<(String, Arc<dyn EntityChecker>)>,
}

impl EntityCheckerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a checker for one namespace prefix.
    pub fn register(&mut self, namespace: impl Into<String>, checker: Arc<dyn EntityChecker>) {
        self.checkers.push((namespace.into(), checker));
    }

    fn checker_for(&self, uri: &str) -> Option<&Arc<dyn EntityChecker>> {
        self.checkers
            .iter()
            .find(|(namespace, _)| uri.starts_with(namespace.as_str()))
            .map(|(_, checker)| checker)
    }

    /// Check every URI of every meaning against its registered checker and
    /// mark each meaning with the verdict, observable via
    /// [`Meaning::existence`].
    ///
    /// A meaning is `Exists` as soon as one URI is confirmed, `Missing`
    /// when at least one URI was checked and all checked URIs came back
    /// absent, and stays `Unverified` otherwise.
    pub async fn check_meanings(&self, meanings: &mut [Meaning]) {
        for meaning in meanings {
            self.check_meaning(meaning).await;
        }
    }

    async fn check_meaning(&self, meaning: &mut Meaning) {
        let mut checked = 0usize;
        let mut confirmed_missing = 0usize;

        let uris: Vec<String> = meaning.iter().map(str::to_owned).collect();
        for uri in uris {
            let Some(checker) = self.checker_for(&uri) else {
                continue;
            };
            match checker.exists(&uri).await {
                Some(true) => {
                    meaning.set_existence(Existence::Exists);
                    return;
                }
                Some(false) => {
                    checked += 1;
                    confirmed_missing += 1;
                }
                None => checked += 1,
            }
        }

        if checked > 0 && checked == confirmed_missing {
            meaning.set_existence(Existence::Missing);
        }
    }
}
