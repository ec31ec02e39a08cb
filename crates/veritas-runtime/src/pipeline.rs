//! The verification pipeline.
//!
//! One call to [`VerificationPipeline::verify`] runs a full check:
//! - Fan-out: every evidence source is queried concurrently
//! - Template selection from the sufficiency flag
//! - A single verdict completion
//! - Heuristic parsing of the model's answer
//!
//! A failed completion never surfaces as an error. The report instead
//! carries the fallback verdict and no evidence.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use veritas_core::{build_prompt, EvidenceSet, PromptTemplate, Verdict};

use crate::aggregator::EvidenceAggregator;
use crate::config::{ConfigError, VeritasConfig};
use crate::providers::{CompletionConfig, LlmProvider, ProviderError, ProviderRegistry};
use crate::requester::VerdictRequester;
use crate::secrets::{
    CredentialBuilder, CredentialSet, GNEWS_API_KEY_ENV, GOOGLE_API_KEY_ENV, GOOGLE_CSE_ID_ENV,
    NEWS_API_KEY_ENV,
};
use crate::sources::{
    build_http_client, EvidenceSource, GNewsSource, GoogleSearchSource, NewsApiSource,
};

/// The outcome of one check, ready for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    /// Parsed verdict (fallback if the completion failed)
    pub verdict: Verdict,

    /// Evidence shown alongside the verdict (emptied if the completion failed)
    pub evidence: EvidenceSet,

    /// Template the prompt was rendered from
    pub template: PromptTemplate,

    /// Whether the fallback verdict was substituted
    pub completion_failed: bool,

    /// When the check finished
    pub checked_at: DateTime<Utc>,
}

/// Every credential the configured runtime needs.
///
/// The LLM key depends on `config.llm.provider`, so an unknown provider
/// fails here rather than later.
pub fn required_credentials(
    config: &VeritasConfig,
    registry: &ProviderRegistry,
) -> Result<CredentialBuilder, ConfigError> {
    let llm_key = registry.factory(&config.llm.provider)?.api_key_env();

    Ok(CredentialBuilder::new()
        .require(GOOGLE_API_KEY_ENV, "Google API key")
        .require(GOOGLE_CSE_ID_ENV, "Google search engine id")
        .require(NEWS_API_KEY_ENV, "NewsAPI key")
        .require(GNEWS_API_KEY_ENV, "GNews token")
        .require(llm_key, "LLM API key"))
}

/// Aggregator and requester wired together.
pub struct VerificationPipeline {
    aggregator: EvidenceAggregator,
    requester: VerdictRequester,
}

impl VerificationPipeline {
    /// Create a pipeline from its parts.
    pub fn new(aggregator: EvidenceAggregator, requester: VerdictRequester) -> Self {
        Self {
            aggregator,
            requester,
        }
    }

    /// Start a builder.
    pub fn builder() -> VerificationPipelineBuilder {
        VerificationPipelineBuilder::new()
    }

    /// Assemble the production pipeline: Google, NewsAPI and GNews in that
    /// order, plus the LLM provider selected by `config.llm.provider`.
    pub fn from_config(
        config: &VeritasConfig,
        credentials: &CredentialSet,
        registry: &ProviderRegistry,
    ) -> Result<Self, ConfigError> {
        let client = build_http_client(&config.search)?;

        let sources: Vec<Arc<dyn EvidenceSource>> = vec![
            Arc::new(GoogleSearchSource::new(
                client.clone(),
                &config.search,
                credentials,
            )?),
            Arc::new(NewsApiSource::new(
                client.clone(),
                &config.search,
                credentials,
            )?),
            Arc::new(GNewsSource::new(client.clone(), &config.search, credentials)?),
        ];

        let provider = registry.create(&config.llm, credentials, client)?;

        info!(
            provider = provider.name(),
            model = %config.llm.model,
            sources = sources.len(),
            "Verification pipeline ready"
        );

        Ok(Self::new(
            EvidenceAggregator::with_sources(sources),
            VerdictRequester::new(provider, CompletionConfig::from(&config.llm)),
        ))
    }

    /// The evidence aggregator.
    pub fn aggregator(&self) -> &EvidenceAggregator {
        &self.aggregator
    }

    /// Check `text` and produce a report.
    ///
    /// `text` is used verbatim as the search query and in the prompt;
    /// length and blankness are checked by the caller.
    pub async fn verify(&self, text: &str) -> VerificationReport {
        let aggregated = self.aggregator.aggregate(text).await;
        let template = PromptTemplate::select(aggregated.has_sufficient_evidence);
        let prompt = build_prompt(
            text,
            &aggregated.evidence,
            aggregated.has_sufficient_evidence,
        );

        let (verdict, evidence, completion_failed) = match self.requester.request(&prompt).await {
            Ok(raw) => (Verdict::from_raw(raw), aggregated.evidence, false),
            Err(_) => (Verdict::fallback(), aggregated.evidence.cleared(), true),
        };

        info!(
            label = ?verdict.label,
            confidence = verdict.confidence,
            template = ?template,
            completion_failed,
            "Check complete"
        );

        VerificationReport {
            verdict,
            evidence,
            template,
            completion_failed,
            checked_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for VerificationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationPipeline")
            .field("aggregator", &self.aggregator)
            .field("requester", &self.requester)
            .finish()
    }
}

/// Builder for [`VerificationPipeline`].
pub struct VerificationPipelineBuilder {
    sources: Vec<Arc<dyn EvidenceSource>>,
    provider: Option<Arc<dyn LlmProvider>>,
    completion: CompletionConfig,
}

impl VerificationPipelineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            provider: None,
            completion: CompletionConfig::default(),
        }
    }

    /// Add an evidence source. Sources are queried in the order added.
    pub fn source(mut self, source: Arc<dyn EvidenceSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Set the LLM provider.
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the completion settings.
    pub fn completion(mut self, completion: CompletionConfig) -> Self {
        self.completion = completion;
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<VerificationPipeline, ProviderError> {
        let provider = self
            .provider
            .ok_or_else(|| ProviderError::NotConfigured("No provider set".to_string()))?;

        Ok(VerificationPipeline::new(
            EvidenceAggregator::with_sources(self.sources),
            VerdictRequester::new(provider, self.completion),
        ))
    }
}

impl Default for VerificationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
