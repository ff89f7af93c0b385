//! Bounded in-memory same-as cache.

use async_trait::async_trait;
use moka::future::Cache;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::sameas::SameAsRetriever;

/// Caching decorator holding resolved equivalence sets in a bounded
/// in-memory store. Eviction approximates least-recently-used once the
/// capacity is reached. Construction never fails; an invalid configured
/// capacity was already replaced by the default during config parsing.
pub struct InMemoryCache {
    inner: Arc<dyn SameAsRetriever>,
    entries: Cache<String, Arc<BTreeSet<String>>>,
}

impl InMemoryCache {
    pub fn new(inner: Arc<dyn SameAsRetriever>, capacity: u64) -> Self {
        let entries = Cache::builder().max_capacity(capacity).build();
        Self { inner, entries }
    }

    /// Number of entries currently held.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

#[async_trait]
impl SameAsRetriever for InMemoryCache {
    async fn retrieve(&self, uri: &str) -> BTreeSet<String> {
        if let Some(hit) = self.entries.get(uri).await {
            return (*hit).clone();
        }

        let resolved = self.inner.retrieve(uri).await;
        self.entries
            .insert(uri.to_owned(), Arc::new(resolved.clone()))
            .await;
        resolved
    }
}
