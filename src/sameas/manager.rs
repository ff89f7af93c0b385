//! Domain-based dispatch between same-as resolution strategies.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::{singleton, SameAsRetriever};
use crate::meaning::domain_of;

/// Dispatches a resolution request to the strategies registered for the
/// URI's authority, or to a single static fallback when no entry matches.
///
/// A domain may carry more than one strategy (e.g. the Wikipedia API
/// strategy plus the DBpedia bridging strategy); their results are unioned.
/// One strategy instance may likewise serve several domains. Registration
/// tables are filled once at startup and read-only afterwards.
#[derive(Default)]
pub struct DomainRetrieverManager {
    by_domain: HashMap<String, Vec<Arc<dyn SameAsRetriever>>>,
    fallback: Option<Arc<dyn SameAsRetriever>>,
}

impl DomainRetrieverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy for one exact domain string.
    pub fn add_domain_retriever(
        &mut self,
        domain: impl Into<String>,
        retriever: Arc<dyn SameAsRetriever>,
    ) {
        self.by_domain.entry(domain.into()).or_default().push(retriever);
    }

    /// Set the strategy used when no domain-specific entry matches.
    pub fn set_static_retriever(&mut self, retriever: Arc<dyn SameAsRetriever>) {
        self.fallback = Some(retriever);
    }

    /// Domains currently registered, mainly for startup logging.
    pub fn registered_domains(&self) -> impl Iterator<Item = &str> {
        self.by_domain.keys().map(String::as_str)
    }
}

#[async_trait]
impl SameAsRetriever for DomainRetrieverManager {
    async fn retrieve(&self, uri: &str) -> BTreeSet<String> {
        if let Some(retrievers) = domain_of(uri).and_then(|domain| self.by_domain.get(domain)) {
            let mut result = singleton(uri);
            for retriever in retrievers {
                result.extend(retriever.retrieve(uri).await);
            }
            return result;
        }

        match &self.fallback {
            Some(retriever) => retriever.retrieve(uri).await,
            None => singleton(uri),
        }
    }
}
