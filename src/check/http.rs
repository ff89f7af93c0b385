//! HTTP-based entity-existence probing.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::EntityChecker;
use crate::error::ResolutionError;

/// Probes entity existence with a HEAD request against the URI itself.
///
/// Linked-data servers answer 2xx (or a redirect) for minted resources and
/// 404 for unknown ones. Transport failures and timeouts yield `None`: an
/// unreachable endpoint must not mark entities as absent.
pub struct HttpEntityChecker {
    client: Client,
}

impl HttpEntityChecker {
    pub fn new(timeout: Duration) -> Result<Self, ResolutionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EntityChecker for HttpEntityChecker {
    async fn exists(&self, uri: &str) -> Option<bool> {
        match self.client.head(uri).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() || status.is_redirection() {
                    Some(true)
                } else if status.is_client_error() {
                    Some(false)
                } else {
                    // Server errors say nothing about the entity.
                    None
                }
            }
            Err(e) => {
                tracing::debug!("Existence check for {uri} failed: {e}");
                None
            }
        }
    }
}
