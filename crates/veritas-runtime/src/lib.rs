//! # veritas-runtime
//!
//! Evidence gathering and LLM verdicts for veritas.
//!
//! This crate owns everything that touches the network:
//! - Querying Google Custom Search, NewsAPI and GNews concurrently
//! - Sending the prompt rendered by `veritas-core` to a chat-completions model
//! - Loading configuration and API keys at startup
//!
//! ## Failure model
//!
//! A check never fails once the runtime is assembled. Search failures leave
//! their provider's group empty, and a failed completion produces the
//! fallback verdict. Only startup (configuration, missing keys) returns
//! errors.
//!
//! ## Example
//!
//! ```rust,ignore
//! use veritas_runtime::{required_credentials, ProviderRegistry, VerificationPipeline, VeritasConfig};
//!
//! let config = VeritasConfig::load(None)?;
//! let registry = ProviderRegistry::with_defaults();
//! let credentials = required_credentials(&config, &registry)?.build_from_env()?;
//! let pipeline = VerificationPipeline::from_config(&config, &credentials, &registry)?;
//!
//! let report = pipeline.verify("თბილისი საქართველოს დედაქალაქია.").await;
//! println!("{} ({}%)", report.verdict.label, report.verdict.confidence);
//! ```

pub mod aggregator;
pub mod config;
pub mod pipeline;
pub mod providers;
pub mod requester;
pub mod resilience;
pub mod secrets;
pub mod sources;

pub use aggregator::{AggregatedEvidence, EvidenceAggregator};
pub use config::{ConfigError, LlmConfig, SearchConfig, VeritasConfig};
pub use pipeline::{
    required_credentials, VerificationPipeline, VerificationPipelineBuilder, VerificationReport,
};
pub use providers::{
    ChatMessage, CompletionConfig, LlmProvider, ProviderError, ProviderFactory, ProviderRegistry,
};
pub use requester::VerdictRequester;
pub use resilience::{RetryPolicy, Transient};
pub use secrets::{ApiCredential, CredentialBuilder, CredentialSet};
pub use sources::{
    build_http_client, EvidenceSource, GNewsSource, GoogleSearchSource, NewsApiSource, SourceError,
};
