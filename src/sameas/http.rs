//! Generic HTTP linked-data same-as retrieval.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use super::{singleton, SameAsRetriever};
use crate::error::ResolutionError;

const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";

/// Same-as retrieval against arbitrary configured linked-data domains.
///
/// Dereferences the URI with an RDF/JSON `Accept` header and collects the
/// `owl:sameAs` statements of the response. One instance is shared by all
/// configured domains. Failures of any kind degrade to the singleton set.
pub struct HttpSameAsRetriever {
    client: Client,
}

/// RDF/JSON resource description: subject, then predicate, then objects.
type RdfJsonDocument = HashMap<String, HashMap<String, Vec<RdfJsonObject>>>;

#[derive(Debug, Deserialize)]
struct RdfJsonObject {
    #[serde(rename = "type")]
    object_type: String,
    value: String,
}

impl HttpSameAsRetriever {
    /// Create a retriever with a bounded per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, ResolutionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn request_same_uris(&self, uri: &str) -> Result<BTreeSet<String>, ResolutionError> {
        let response = self
            .client
            .get(uri)
            .header("Accept", "application/rdf+json, application/json")
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let document: RdfJsonDocument =
            serde_json::from_str(&body).map_err(|e| ResolutionError::MalformedResponse {
                uri: uri.to_owned(),
                reason: e.to_string(),
            })?;
        let mut found = BTreeSet::new();

        for (subject, predicates) in &document {
            let Some(objects) = predicates.get(OWL_SAME_AS) else {
                continue;
            };
            for object in objects {
                if object.object_type != "uri" {
                    continue;
                }
                if subject == uri {
                    found.insert(object.value.clone());
                } else if object.value == uri {
                    // Reverse statement: subject sameAs <our uri>.
                    found.insert(subject.clone());
                }
            }
        }

        Ok(found)
    }
}

#[async_trait]
impl SameAsRetriever for HttpSameAsRetriever {
    async fn retrieve(&self, uri: &str) -> BTreeSet<String> {
        match self.request_same_uris(uri).await {
            Ok(found) => {
                let mut set = singleton(uri);
                set.extend(found);
                set
            }
            Err(e) => {
                tracing::debug!("Same-as lookup for {uri} failed: {e}");
                singleton(uri)
            }
        }
    }
}
