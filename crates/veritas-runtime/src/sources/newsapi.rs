//! NewsAPI `/v2/everything`.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use veritas_core::EvidenceItem;

use super::http::{get_json, NewsArticle};
use super::{EvidenceSource, SourceError};
use crate::config::{ConfigError, SearchConfig};
use crate::secrets::{ApiCredential, CredentialSet, NEWS_API_KEY_ENV};

/// News search through NewsAPI. Single attempt, no retry.
pub struct NewsApiSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: Arc<ApiCredential>,
    language: String,
    page_size: u32,
    timeout: Duration,
}

impl std::fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key)
            .field("language", &self.language)
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

impl NewsApiSource {
    /// Source id.
    pub const NAME: &'static str = "newsapi";

    /// Prompt heading for this source's results.
    pub const HEADING: &'static str = "🗞 NewsAPI სიახლეები:";

    /// Presentation title for this source's results.
    pub const TITLE: &'static str = "NewsAPI-ზე";

    /// Create the source from configuration and loaded credentials.
    pub fn new(
        client: reqwest::Client,
        search: &SearchConfig,
        credentials: &CredentialSet,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            endpoint: search.newsapi.endpoint.clone(),
            api_key: credentials.get(NEWS_API_KEY_ENV)?,
            language: search.newsapi.language.clone(),
            page_size: search.newsapi.page_size,
            timeout: search.timeout,
        })
    }
}

#[async_trait]
impl EvidenceSource for NewsApiSource {
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
        self.page_size as usize
    }

    async fn search(&self, query: &str) -> Result<Vec<EvidenceItem>, SourceError> {
        let page_size = self.page_size.to_string();
        let request = self.client.get(&self.endpoint).timeout(self.timeout).query(&[
            ("q", query),
            ("language", self.language.as_str()),
            ("pageSize", page_size.as_str()),
            ("apiKey", self.api_key.expose()),
        ]);

        let response: EverythingResponse = get_json(request, self.timeout).await?;
        Ok(response.articles.into_iter().map(EvidenceItem::from).collect())
    }
}
