//! Google Custom Search JSON API.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use veritas_core::EvidenceItem;

use super::http::get_json;
use super::{EvidenceSource, SourceError};
use crate::config::{ConfigError, GoogleSearchConfig, SearchConfig};
use crate::resilience::RetryPolicy;
use crate::secrets::{ApiCredential, CredentialSet, GOOGLE_API_KEY_ENV, GOOGLE_CSE_ID_ENV};

/// Web search through a Programmable Search Engine.
///
/// Transient failures (transport, timeout, 429, 5xx) are retried with
/// exponential backoff; everything else fails the search immediately.
pub struct GoogleSearchSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: Arc<ApiCredential>,
    engine_id: Arc<ApiCredential>,
    num_results: u32,
    timeout: Duration,
    retry: RetryPolicy,
}

impl std::fmt::Debug for GoogleSearchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSearchSource")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key)
            .field("engine_id", &self.engine_id)
            .field("num_results", &self.num_results)
            .field("retry", &self.retry)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    // Absent when the search has no hits
    #[serde(default)]
    items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl GoogleSearchSource {
    /// Source id.
    pub const NAME: &'static str = "google";

    /// Prompt heading for this source's results.
    pub const HEADING: &'static str = "🔍 Google შედეგები:";

    /// Presentation title for this source's results.
    pub const TITLE: &'static str = "Google-ში";

    /// Create the source from configuration and loaded credentials.
    pub fn new(
        client: reqwest::Client,
        search: &SearchConfig,
        credentials: &CredentialSet,
    ) -> Result<Self, ConfigError> {
        let GoogleSearchConfig {
            endpoint,
            num_results,
            max_attempts,
            backoff,
        } = &search.google;

        Ok(Self {
            client,
            endpoint: endpoint.clone(),
            api_key: credentials.get(GOOGLE_API_KEY_ENV)?,
            engine_id: credentials.get(GOOGLE_CSE_ID_ENV)?,
            num_results: *num_results,
            timeout: search.timeout,
            retry: RetryPolicy::new(*max_attempts, *backoff),
        })
    }

    async fn request(&self, query: &str) -> Result<Vec<EvidenceItem>, SourceError> {
        let num = self.num_results.to_string();
        let request = self.client.get(&self.endpoint).timeout(self.timeout).query(&[
            ("key", self.api_key.expose()),
            ("cx", self.engine_id.expose()),
            ("q", query),
            ("num", num.as_str()),
        ]);

        let response: SearchResponse = get_json(request, self.timeout).await?;
        Ok(response
            .items
            .into_iter()
            .map(|r| EvidenceItem::from_parts(r.title, r.link, r.snippet))
            .collect())
    }
}

#[async_trait]
impl EvidenceSource for GoogleSearchSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn heading(&self) -> &str {
        Self::HEADING
    }

    fn title(&self) -> &str {
        Self::TITLE
    }

    fn max_results(&self) -> usize {
        self.num_results as usize
    }

    async fn search(&self, query: &str) -> Result<Vec<EvidenceItem>, SourceError> {
        self.retry.run(Self::NAME, || self.request(query)).await
    }
}
