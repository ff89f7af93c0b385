//! Same-as resolution: computing the set of URIs equivalent to a given URI
//! across knowledge bases.
//!
//! The module is organized as a single capability trait,
//! [`SameAsRetriever`], with two kinds of implementors:
//!
//! - **Strategies** that talk to one knowledge base:
//!   [`HttpSameAsRetriever`] (linked-data lookups for configured domains),
//!   [`WikipediaApiRetriever`] (MediaWiki redirect resolution) and
//!   [`WikiDbpediaBridgingRetriever`] (pure string bridging between
//!   Wikipedia and DBpedia URIs). [`ErrorFixingRetriever`] is the static
//!   fallback that repairs malformed percent-encoding.
//!
//! - **Decorators** that wrap another retriever without changing the
//!   contract: [`DomainRetrieverManager`] (dispatch by URI authority),
//!   [`CrawlingDecorator`] (transitive closure of newly discovered URIs)
//!   and the two caching layers in [`cache`].
//!
//! # Example
//!
//! ```rust,ignore
//! use entitylink::sameas::{DomainRetrieverManager, CrawlingDecorator, SameAsRetriever};
//! use std::sync::Arc;
//!
//! let mut manager = DomainRetrieverManager::new();
//! manager.add_domain_retriever("sameas.example.org", Arc::new(my_strategy));
//! let chain = CrawlingDecorator::with_defaults(Arc::new(manager));
//! let equivalents = chain.retrieve("http://sameas.example.org/id/42").await;
//! ```

pub mod cache;
mod crawling;
mod error_fixing;
mod http;
mod manager;
mod wiki;

pub use crawling::CrawlingDecorator;
pub use error_fixing::ErrorFixingRetriever;
pub use http::HttpSameAsRetriever;
pub use manager::DomainRetrieverManager;
pub use wiki::{WikiDbpediaBridgingRetriever, WikipediaApiRetriever};

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Capability of resolving a URI into its equivalence set.
///
/// The returned set always contains the input URI; a strategy that knows
/// nothing (or fails internally) returns the singleton set of its input.
/// Implementations never surface errors to callers.
#[async_trait]
pub trait SameAsRetriever: Send + Sync {
    /// Retrieve all URIs known to denote the same entity as `uri`.
    async fn retrieve(&self, uri: &str) -> BTreeSet<String>;
}

/// A strategy that needs to know which of its registered domains matched,
/// e.g. to rebuild language-specific page URLs.
#[async_trait]
pub trait SingleUriSameAsRetriever: Send + Sync {
    /// Retrieve equivalents of `uri`, whose authority is `domain`.
    async fn retrieve_for_domain(&self, domain: &str, uri: &str) -> BTreeSet<String>;
}

/// Adapter presenting a [`SingleUriSameAsRetriever`] as a plain
/// [`SameAsRetriever`], deriving the domain from the URI itself.
pub struct SingleUriAdapter<R> {
    inner: Arc<R>,
}

impl<R> SingleUriAdapter<R> {
    pub fn new(inner: Arc<R>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R> SameAsRetriever for SingleUriAdapter<R>
where
    R: SingleUriSameAsRetriever,
{
    async fn retrieve(&self, uri: &str) -> BTreeSet<String> {
        match crate::meaning::domain_of(uri) {
            Some(domain) => {
                let domain = domain.to_owned();
                self.inner.retrieve_for_domain(&domain, uri).await
            }
            None => singleton(uri),
        }
    }
}

/// The singleton equivalence set: a URI is always equivalent to itself.
pub(crate) fn singleton(uri: &str) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    set.insert(uri.to_owned());
    set
}
