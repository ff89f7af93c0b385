//! Transitive crawling of same-as links.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::SameAsRetriever;

/// Decorator that re-resolves newly discovered URIs until the equivalence
/// set stops growing, capturing transitive links: when A is the same as B
/// and B the same as C, all three end up in one equivalence set.
///
/// Same-as graphs published by third parties contain cycles, so the loop is
/// bounded twice: by `max_rounds` resolution waves and by `max_visited`
/// distinct URIs handed to the inner retriever per call.
pub struct CrawlingDecorator {
    inner: Arc<dyn SameAsRetriever>,
    max_rounds: usize,
    max_visited: usize,
}

impl CrawlingDecorator {
    pub fn new(inner: Arc<dyn SameAsRetriever>, max_rounds: usize, max_visited: usize) -> Self {
        Self {
            inner,
            max_rounds: max_rounds.max(1),
            max_visited: max_visited.max(1),
        }
    }

    /// Conservative defaults: 3 rounds, 100 visited URIs.
    pub fn with_defaults(inner: Arc<dyn SameAsRetriever>) -> Self {
        Self::new(inner, 3, 100)
    }
}

#[async_trait]
impl SameAsRetriever for CrawlingDecorator {
    async fn retrieve(&self, uri: &str) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        result.insert(uri.to_owned());

        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut frontier: Vec<String> = vec![uri.to_owned()];

        for round in 0..self.max_rounds {
            let mut discovered: Vec<String> = Vec::new();

            for current in frontier.drain(..) {
                if visited.len() >= self.max_visited {
                    tracing::debug!(
                        "Crawl of {uri} hit the visited cap ({}) in round {round}",
                        self.max_visited
                    );
                    return result;
                }
                if !visited.insert(current.clone()) {
                    continue;
                }

                for found in self.inner.retrieve(&current).await {
                    if result.insert(found.clone()) {
                        discovered.push(found);
                    }
                }
            }

            if discovered.is_empty() {
                break;
            }
            frontier = discovered;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sameas::singleton;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Maps each URI to its directly known equivalents.
    struct Lookup {
        edges: HashMap<&'static str, Vec<&'static str>>,
        calls: AtomicUsize,
    }

    impl Lookup {
        fn new(edges: &[(&'static str, &'static str)]) -> Arc<Self> {
            let mut map: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
            for &(from, to) in edges {
                map.entry(from).or_default().push(to);
            }
            Arc::new(Self {
                edges: map,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SameAsRetriever for Lookup {
        async fn retrieve(&self, uri: &str) -> BTreeSet<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut set = singleton(uri);
            if let Some(targets) = self.edges.get(uri) {
                set.extend(targets.iter().map(|t| t.to_string()));
            }
            set
        }
    }

    #[tokio::test]
    async fn test_transitive_closure() {
        let inner = Lookup::new(&[("a", "b"), ("b", "c"), ("c", "d")]);
        let crawler = CrawlingDecorator::new(inner, 5, 100);

        let set = crawler.retrieve("a").await;
        assert_eq!(
            set,
            ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[tokio::test]
    async fn test_terminates_on_cycle() {
        let inner = Lookup::new(&[("a", "b"), ("b", "a")]);
        let crawler = CrawlingDecorator::new(inner.clone(), 10, 100);

        let set = crawler.retrieve("a").await;
        assert_eq!(set.len(), 2);
        // Each URI resolved exactly once despite the cycle.
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_round_cap_limits_depth() {
        let inner = Lookup::new(&[("a", "b"), ("b", "c"), ("c", "d")]);
        let crawler = CrawlingDecorator::new(inner, 2, 100);

        let set = crawler.retrieve("a").await;
        // Round two discovers c but never resolves it, so d stays unknown.
        assert!(set.contains("c"));
        assert!(!set.contains("d"));
    }

    #[tokio::test]
    async fn test_visited_cap() {
        let inner = Lookup::new(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "e")]);
        let crawler = CrawlingDecorator::new(inner.clone(), 10, 2);

        crawler.retrieve("a").await;
        assert!(inner.calls.load(Ordering::SeqCst) <= 2);
    }
}
