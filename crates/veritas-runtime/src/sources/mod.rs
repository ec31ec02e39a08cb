//! Evidence sources.
//!
//! Each source wraps one external search API and turns its response into
//! [`EvidenceItem`]s. Sources never fail a check: any error is logged and
//! the source contributes an empty group.
//!
//! | Source | Endpoint | Retries |
//! |--------|----------|---------|
//! | [`GoogleSearchSource`] | Google Custom Search JSON API | yes, transient errors |
//! | [`NewsApiSource`] | NewsAPI `/v2/everything` | no |
//! | [`GNewsSource`] | GNews `/api/v4/search` | no |

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use veritas_core::{EvidenceItem, ProviderEvidence};

use crate::config::{ConfigError, SearchConfig};
use crate::resilience::Transient;

mod gnews;
mod google;
mod http;
mod newsapi;

pub use gnews::GNewsSource;
pub use google::GoogleSearchSource;
pub use newsapi::NewsApiSource;

/// Errors from a single search request.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

impl Transient for SourceError {
    fn is_transient(&self) -> bool {
        match self {
            SourceError::Transport(_) | SourceError::Timeout(_) => true,
            SourceError::Status { status, .. } => *status == 429 || *status >= 500,
            SourceError::Decode(_) => false,
        }
    }
}

/// One external search provider.
///
/// Implementors provide [`search`](Self::search); callers use
/// [`collect`](Self::collect), which applies the result cap and turns
/// failures into an empty group.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Stable identifier used in logs and reports (e.g. "google").
    fn name(&self) -> &str;

    /// Heading this source's results appear under in the prompt.
    fn heading(&self) -> &str;

    /// Name this source's results are presented under. Defaults to the id.
    fn title(&self) -> &str {
        self.name()
    }

    /// Upper bound on items this source contributes.
    fn max_results(&self) -> usize;

    /// Run one search, including any retries.
    async fn search(&self, query: &str) -> Result<Vec<EvidenceItem>, SourceError>;

    /// Search and return at most [`max_results`](Self::max_results) items,
    /// or nothing if the search failed.
    async fn fetch(&self, query: &str) -> Vec<EvidenceItem> {
        match self.search(query).await {
            Ok(mut items) => {
                items.truncate(self.max_results());
                debug!(provider = self.name(), items = items.len(), "Search completed");
                items
            }
            Err(err) => {
                warn!(provider = self.name(), error = %err, "Search failed, continuing without its evidence");
                Vec::new()
            }
        }
    }

    /// [`fetch`](Self::fetch) wrapped in this source's evidence group.
    async fn collect(&self, query: &str) -> ProviderEvidence {
        let items = self.fetch(query).await;
        ProviderEvidence::new(self.name(), self.heading(), items).with_title(self.title())
    }
}

/// Build the HTTP client shared by every source and the LLM provider.
///
/// The client-wide timeout is the search timeout; the LLM provider
/// overrides it per request.
pub fn build_http_client(config: &SearchConfig) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}
