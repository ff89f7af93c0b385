//! Resolution coordinator that wires the whole component graph.
//!
//! The coordinator builds, once at startup:
//! - the class-hierarchy inferencer from the configured file triples
//! - the KB classifier from the whitelist
//! - the entity-checker manager from the namespace list
//! - the same-as decorator chain: domain dispatch manager, wrapped by the
//!   crawling decorator, wrapped by exactly one caching layer
//!
//! Everything it hands out is immutable and `Arc`-shared, safe to call
//! from as many workers as the surrounding scheduler runs.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::check::{EntityCheckerManager, HttpEntityChecker};
use crate::config::Config;
use crate::error::Result;
use crate::hierarchy::{ClassHierarchyLoader, SubClassInferencer};
use crate::kb::KbClassifier;
use crate::meaning::Meaning;
use crate::sameas::cache::{FileBackedCache, InMemoryCache};
use crate::sameas::{
    CrawlingDecorator, DomainRetrieverManager, ErrorFixingRetriever, HttpSameAsRetriever,
    SameAsRetriever, SingleUriAdapter, WikiDbpediaBridgingRetriever, WikipediaApiRetriever,
};

/// Wikipedia language editions wired to the API and bridging strategies.
const WIKIPEDIA_LANGUAGES: [&str; 3] = ["en", "de", "fr"];

/// Entry point over the resolution, classification and checking components.
pub struct ResolutionCoordinator {
    retriever: Arc<dyn SameAsRetriever>,
    classifier: KbClassifier,
    checker: EntityCheckerManager,
    inferencer: Arc<SubClassInferencer>,
    workers: usize,
}

impl ResolutionCoordinator {
    /// Build the full component graph from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let inferencer = Arc::new(ClassHierarchyLoader::new().load_all(&config.hierarchy.files));
        let classifier = KbClassifier::new(config.kb.namespaces.iter().cloned());
        let checker = build_checker_manager(config);
        let retriever = build_retriever_chain(config)?;

        Ok(Self {
            retriever,
            classifier,
            checker,
            inferencer,
            workers: config.runtime.workers.max(1),
        })
    }

    /// Resolve one URI into its equivalence set.
    pub async fn resolve(&self, uri: &str) -> BTreeSet<String> {
        self.retriever.retrieve(uri).await
    }

    /// Resolve one URI into a [`Meaning`].
    pub async fn resolve_meaning(&self, uri: &str) -> Meaning {
        Meaning::from(self.resolve(uri).await)
    }

    /// Resolve many URIs concurrently, bounded by the configured worker
    /// width. Input order is preserved in the output.
    pub async fn resolve_batch(&self, uris: &[String]) -> Vec<BTreeSet<String>> {
        stream::iter(uris)
            .map(|uri| self.retriever.retrieve(uri))
            .buffered(self.workers)
            .collect()
            .await
    }

    /// Does any URI of the meaning belong to a configured knowledge base?
    pub fn is_known_kb(&self, meaning: &Meaning) -> bool {
        self.classifier.is_known_kb(meaning)
    }

    /// Check and mark the meanings' entity existence in place.
    pub async fn check_meanings(&self, meanings: &mut [Meaning]) {
        self.checker.check_meanings(meanings).await;
    }

    /// Transitive subsumption query over the loaded class hierarchy.
    pub fn is_sub_class_of(&self, sub: &str, sup: &str) -> bool {
        self.inferencer.is_sub_class_of(sub, sup)
    }

    pub fn classifier(&self) -> &KbClassifier {
        &self.classifier
    }

    pub fn inferencer(&self) -> &Arc<SubClassInferencer> {
        &self.inferencer
    }

    pub fn retriever(&self) -> &Arc<dyn SameAsRetriever> {
        &self.retriever
    }
}

fn build_checker_manager(config: &Config) -> EntityCheckerManager {
    let mut manager = EntityCheckerManager::new();
    if config.checker.namespaces.is_empty() {
        return manager;
    }

    let timeout = Duration::from_secs(config.checker.http_timeout_secs);
    match HttpEntityChecker::new(timeout) {
        Ok(checker) => {
            let checker: Arc<dyn crate::check::EntityChecker> = Arc::new(checker);
            for namespace in &config.checker.namespaces {
                manager.register(namespace.clone(), checker.clone());
            }
        }
        Err(e) => warn!("Could not create the HTTP entity checker: {e}"),
    }
    manager
}

/// Assemble the same-as decorator chain in its fixed precedence order.
fn build_retriever_chain(config: &Config) -> Result<Arc<dyn SameAsRetriever>> {
    let timeout = Duration::from_secs(config.sameas.http_timeout_secs);

    let mut manager = DomainRetrieverManager::new();
    manager.set_static_retriever(Arc::new(ErrorFixingRetriever::new()));

    if !config.sameas.http_domains.is_empty() {
        match HttpSameAsRetriever::new(timeout) {
            Ok(retriever) => {
                let retriever = Arc::new(retriever);
                for domain in &config.sameas.http_domains {
                    manager.add_domain_retriever(domain.clone(), retriever.clone());
                }
            }
            Err(e) => warn!("Could not create the HTTP same-as retriever: {e}"),
        }
    }

    match WikipediaApiRetriever::new(timeout) {
        Ok(retriever) => {
            let adapter = Arc::new(SingleUriAdapter::new(Arc::new(retriever)));
            for language in WIKIPEDIA_LANGUAGES {
                manager.add_domain_retriever(format!("{language}.wikipedia.org"), adapter.clone());
            }
        }
        Err(e) => warn!("Could not create the Wikipedia API retriever: {e}"),
    }

    Arc::new(WikiDbpediaBridgingRetriever::new(WIKIPEDIA_LANGUAGES)).add_to_manager(&mut manager);

    let crawler: Arc<dyn SameAsRetriever> = Arc::new(CrawlingDecorator::new(
        Arc::new(manager),
        config.sameas.crawl_max_rounds,
        config.sameas.crawl_max_visited,
    ));

    Ok(build_cache_layer(config, crawler))
}

/// Cache precedence: file-backed when configured and usable, bounded
/// in-memory otherwise. The in-memory variant never fails.
fn build_cache_layer(
    config: &Config,
    inner: Arc<dyn SameAsRetriever>,
) -> Arc<dyn SameAsRetriever> {
    if let Some(path) = &config.cache.file {
        match FileBackedCache::create(inner.clone(), path) {
            Ok(cache) => return Arc::new(cache),
            Err(e) => {
                warn!(
                    "Couldn't create the file-backed same-as cache: {e}. \
                     Falling back to the in-memory cache."
                );
            }
        }
    }

    info!(
        "Using in-memory same-as cache with capacity {}",
        config.cache.memory_capacity
    );
    Arc::new(InMemoryCache::new(inner, config.cache.memory_capacity))
}
