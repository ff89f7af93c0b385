//! End-to-end tests of the same-as decorator chain.

use async_trait::async_trait;
use entitylink::{
    CrawlingDecorator, DomainRetrieverManager, ErrorFixingRetriever, FileBackedCache,
    InMemoryCache, SameAsRetriever,
};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Strategy answering from a fixed edge list, counting invocations.
struct FixtureRetriever {
    edges: Vec<(&'static str, &'static str)>,
    calls: AtomicUsize,
}

impl FixtureRetriever {
    fn new(edges: &[(&'static str, &'static str)]) -> Arc<Self> {
        Arc::new(Self {
            edges: edges.to_vec(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SameAsRetriever for FixtureRetriever {
    async fn retrieve(&self, uri: &str) -> BTreeSet<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut set = BTreeSet::new();
        set.insert(uri.to_owned());
        for (from, to) in &self.edges {
            if *from == uri {
                set.insert(to.to_string());
            }
        }
        set
    }
}

fn build_chain(
    fixture: Arc<FixtureRetriever>,
    cache_file: Option<&std::path::Path>,
) -> Arc<dyn SameAsRetriever> {
    let mut manager = DomainRetrieverManager::new();
    manager.add_domain_retriever("kb-one.example.org", fixture.clone());
    manager.add_domain_retriever("kb-two.example.org", fixture);
    manager.set_static_retriever(Arc::new(ErrorFixingRetriever::new()));

    let crawler: Arc<dyn SameAsRetriever> =
        Arc::new(CrawlingDecorator::new(Arc::new(manager), 3, 100));

    match cache_file {
        Some(path) => Arc::new(FileBackedCache::create(crawler, path).unwrap()),
        None => Arc::new(InMemoryCache::new(crawler, 1000)),
    }
}

#[tokio::test]
async fn transitive_links_are_crawled_across_knowledge_bases() {
    let fixture = FixtureRetriever::new(&[
        (
            "http://kb-one.example.org/id/42",
            "http://kb-two.example.org/id/A42",
        ),
        (
            "http://kb-two.example.org/id/A42",
            "http://kb-two.example.org/id/B42",
        ),
    ]);
    let chain = build_chain(fixture, None);

    let set = chain.retrieve("http://kb-one.example.org/id/42").await;
    assert!(set.contains("http://kb-one.example.org/id/42"));
    assert!(set.contains("http://kb-two.example.org/id/A42"));
    assert!(set.contains("http://kb-two.example.org/id/B42"));
}

#[tokio::test]
async fn warm_cache_is_idempotent_and_skips_the_network_strategy() {
    let fixture = FixtureRetriever::new(&[(
        "http://kb-one.example.org/id/42",
        "http://kb-two.example.org/id/A42",
    )]);
    let chain = build_chain(fixture.clone(), None);

    let cold = chain.retrieve("http://kb-one.example.org/id/42").await;
    let calls_after_cold = fixture.calls();
    let warm = chain.retrieve("http://kb-one.example.org/id/42").await;

    assert_eq!(cold, warm);
    assert_eq!(fixture.calls(), calls_after_cold);
}

#[tokio::test]
async fn file_cache_survives_restart_and_skips_resolution() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sameas.jsonl");

    let fixture = FixtureRetriever::new(&[(
        "http://kb-one.example.org/id/42",
        "http://kb-two.example.org/id/A42",
    )]);
    let first_run = build_chain(fixture, Some(&path));
    let cold = first_run.retrieve("http://kb-one.example.org/id/42").await;

    // New chain over the same file: the entry must come from disk.
    let fresh_fixture = FixtureRetriever::new(&[]);
    let second_run = build_chain(fresh_fixture.clone(), Some(&path));
    let warm = second_run.retrieve("http://kb-one.example.org/id/42").await;

    assert_eq!(cold, warm);
    assert_eq!(fresh_fixture.calls(), 0);
}

#[tokio::test]
async fn unregistered_domain_falls_back_to_error_fixing() {
    let fixture = FixtureRetriever::new(&[]);
    let chain = build_chain(fixture.clone(), None);

    let set = chain.retrieve("http://elsewhere.example.com/%_of_GDP").await;
    assert!(set.contains("http://elsewhere.example.com/%_of_GDP"));
    assert!(set.contains("http://elsewhere.example.com/%25_of_GDP"));
    assert_eq!(fixture.calls(), 0);
}

#[tokio::test]
async fn concurrent_resolutions_share_the_cache() {
    let fixture = FixtureRetriever::new(&[(
        "http://kb-one.example.org/id/42",
        "http://kb-two.example.org/id/A42",
    )]);
    let chain = build_chain(fixture.clone(), None);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let chain = chain.clone();
        handles.push(tokio::spawn(async move {
            chain.retrieve("http://kb-one.example.org/id/42").await
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
