//! GNews `/api/v4/search`.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use veritas_core::EvidenceItem;

use super::http::{get_json, NewsArticle};
use super::{EvidenceSource, SourceError};
use crate::config::{ConfigError, SearchConfig};
use crate::secrets::{ApiCredential, CredentialSet, GNEWS_API_KEY_ENV};

/// News search through GNews. Single attempt, no retry.
pub struct GNewsSource {
    client: reqwest::Client,
    endpoint: String,
    token: Arc<ApiCredential>,
    language: String,
    max_results: u32,
    timeout: Duration,
}

impl std::fmt::Debug for GNewsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GNewsSource")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token)
            .field("language", &self.language)
            .field("max_results", &self.max_results)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

impl GNewsSource {
    /// Source id.
    pub const NAME: &'static str = "gnews";

    /// Prompt heading for this source's results.
    pub const HEADING: &'static str = "📰 GNews სტატიები:";

    /// Presentation title for this source's results.
    pub const TITLE: &'static str = "GNews-ზე";

    /// Create the source from configuration and loaded credentials.
    pub fn new(
        client: reqwest::Client,
        search: &SearchConfig,
        credentials: &CredentialSet,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            endpoint: search.gnews.endpoint.clone(),
            token: credentials.get(GNEWS_API_KEY_ENV)?,
            language: search.gnews.language.clone(),
            max_results: search.gnews.max_results,
            timeout: search.timeout,
        })
    }
}

#[async_trait]
impl EvidenceSource for GNewsSource {
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
        self.max_results as usize
    }

    async fn search(&self, query: &str) -> Result<Vec<EvidenceItem>, SourceError> {
        let max = self.max_results.to_string();
        let request = self.client.get(&self.endpoint).timeout(self.timeout).query(&[
            ("q", query),
            ("lang", self.language.as_str()),
            ("token", self.token.expose()),
            ("max", max.as_str()),
        ]);

        let response: SearchResponse = get_json(request, self.timeout).await?;
        Ok(response.articles.into_iter().map(EvidenceItem::from).collect())
    }
}
