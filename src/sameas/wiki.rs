//! Wikipedia-centric same-as strategies.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use super::{singleton, SameAsRetriever, SingleUriSameAsRetriever};
use crate::error::ResolutionError;
use crate::meaning::domain_of;

const WIKI_PATH: &str = "/wiki/";
const DBPEDIA_RESOURCE_PATH: &str = "/resource/";

/// Resolves Wikipedia page redirects through the MediaWiki query API.
///
/// A page URI whose title is a redirect (`Peking` redirecting to
/// `Beijing`) denotes the same entity as its target, so the canonical page
/// URI is reported as an equivalent. The strategy is domain-aware because
/// the API endpoint and the rebuilt page URL both live on the matched
/// language domain.
pub struct WikipediaApiRetriever {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    redirects: Vec<Redirect>,
    #[serde(default)]
    normalized: Vec<Redirect>,
}

#[derive(Debug, Deserialize)]
struct Redirect {
    to: String,
}

impl WikipediaApiRetriever {
    pub fn new(timeout: Duration) -> Result<Self, ResolutionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn resolve_redirect(
        &self,
        domain: &str,
        title: &str,
    ) -> Result<Option<String>, ResolutionError> {
        let endpoint = format!("https://{domain}/w/api.php");
        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("action", "query"),
                ("titles", title),
                ("redirects", ""),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: QueryResponse = response.json().await?;
        let Some(query) = body.query else {
            return Ok(None);
        };

        // The API reports normalization (underscore handling) and redirect
        // resolution separately; the last hop wins.
        let target = query
            .redirects
            .last()
            .or(query.normalized.last())
            .map(|r| r.to.clone());
        Ok(target)
    }
}

#[async_trait]
impl SingleUriSameAsRetriever for WikipediaApiRetriever {
    async fn retrieve_for_domain(&self, domain: &str, uri: &str) -> BTreeSet<String> {
        let mut set = singleton(uri);
        let Some(title) = page_title(uri) else {
            return set;
        };

        match self.resolve_redirect(domain, &title.replace('_', " ")).await {
            Ok(Some(target)) => {
                let target_title = target.replace(' ', "_");
                set.insert(format!("http://{domain}{WIKI_PATH}{target_title}"));
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("Wikipedia redirect lookup for {uri} failed: {e}"),
        }
        set
    }
}

/// Bridges Wikipedia page URIs and DBpedia resource URIs in both
/// directions without network traffic. The two knowledge bases mint their
/// identifiers from the same page titles, language by language.
///
/// The strategy knows every domain it serves and registers itself for all
/// of them at once via [`add_to_manager`](Self::add_to_manager).
pub struct WikiDbpediaBridgingRetriever {
    languages: Vec<String>,
}

impl WikiDbpediaBridgingRetriever {
    pub fn new(languages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }

    /// Register this strategy under every Wikipedia and DBpedia domain it
    /// can bridge.
    pub fn add_to_manager(self: Arc<Self>, manager: &mut super::DomainRetrieverManager) {
        manager.add_domain_retriever("dbpedia.org", self.clone());
        for language in &self.languages {
            manager.add_domain_retriever(format!("{language}.wikipedia.org"), self.clone());
            manager.add_domain_retriever(format!("{language}.dbpedia.org"), self.clone());
        }
    }

    fn wikipedia_to_dbpedia(&self, domain: &str, uri: &str) -> Option<String> {
        let language = domain.strip_suffix(".wikipedia.org")?;
        if !self.languages.iter().any(|l| l == language) {
            return None;
        }
        let title = page_title(uri)?;
        if language == "en" {
            Some(format!("http://dbpedia.org{DBPEDIA_RESOURCE_PATH}{title}"))
        } else {
            Some(format!(
                "http://{language}.dbpedia.org{DBPEDIA_RESOURCE_PATH}{title}"
            ))
        }
    }

    fn dbpedia_to_wikipedia(&self, domain: &str, uri: &str) -> Option<String> {
        let language = if domain == "dbpedia.org" {
            "en"
        } else {
            domain.strip_suffix(".dbpedia.org")?
        };
        let title = resource_name(uri)?;
        Some(format!("http://{language}.wikipedia.org{WIKI_PATH}{title}"))
    }
}

#[async_trait]
impl SameAsRetriever for WikiDbpediaBridgingRetriever {
    async fn retrieve(&self, uri: &str) -> BTreeSet<String> {
        let mut set = singleton(uri);
        let Some(domain) = domain_of(uri) else {
            return set;
        };

        let bridged = if domain.ends_with("wikipedia.org") {
            self.wikipedia_to_dbpedia(domain, uri)
        } else {
            self.dbpedia_to_wikipedia(domain, uri)
        };

        if let Some(bridged) = bridged {
            set.insert(bridged);
        }
        set
    }
}

/// Title segment of a Wikipedia page URI (everything after `/wiki/`).
fn page_title(uri: &str) -> Option<&str> {
    let (_, title) = uri.split_once(WIKI_PATH)?;
    (!title.is_empty()).then_some(title)
}

/// Resource name of a DBpedia URI (everything after `/resource/`).
fn resource_name(uri: &str) -> Option<&str> {
    let (_, name) = uri.split_once(DBPEDIA_RESOURCE_PATH)?;
    (!name.is_empty()).then_some(name)
}
