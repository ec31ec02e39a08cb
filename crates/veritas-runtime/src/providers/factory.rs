//! Provider factory pattern for selecting the verdict model by name.
//!
//! New backends are added by registering a factory, not by branching on
//! the provider name.
//!
//! ## Usage
//!
//! ```ignore
//! let registry = ProviderRegistry::with_defaults();
//! let provider = registry.create(&config.llm, &credentials, client)?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ChatCompletionsFactory, LlmProvider};
use crate::config::{ConfigError, LlmConfig};
use crate::secrets::CredentialSet;

/// Factory for creating LLM providers from configuration.
pub trait ProviderFactory: Send + Sync {
    /// Unique identifier, matched against `llm.provider`.
    fn provider_type(&self) -> &'static str;

    /// Environment variable that must hold this provider's API key.
    fn api_key_env(&self) -> &'static str;

    /// Create a provider instance.
    ///
    /// `client` is the shared HTTP client built at startup.
    fn create(
        &self,
        config: &LlmConfig,
        credentials: &CredentialSet,
        client: reqwest::Client,
    ) -> Result<Arc<dyn LlmProvider>, ConfigError>;

    /// Human-readable description of this provider.
    fn description(&self) -> &'static str {
        "LLM Provider"
    }
}

/// Registry of available provider factories.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in providers (`groq`, `openai`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ChatCompletionsFactory::groq()));
        registry.register(Arc::new(ChatCompletionsFactory::openai()));
        registry
    }

    /// Register a provider factory.
    ///
    /// If a factory with the same type already exists, it will be replaced.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories
            .insert(factory.provider_type().to_string(), factory);
    }

    /// Get the factory selected by `llm.provider`.
    pub fn factory(&self, provider_type: &str) -> Result<&Arc<dyn ProviderFactory>, ConfigError> {
        self.factories
            .get(provider_type)
            .ok_or_else(|| ConfigError::UnknownProvider {
                name: provider_type.to_string(),
                available: self.available_types().into_iter().map(String::from).collect(),
            })
    }

    /// Create the provider selected by `config.provider`.
    pub fn create(
        &self,
        config: &LlmConfig,
        credentials: &CredentialSet,
        client: reqwest::Client,
    ) -> Result<Arc<dyn LlmProvider>, ConfigError> {
        self.factory(&config.provider)?
            .create(config, credentials, client)
    }

    /// List available provider types.
    pub fn available_types(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{
        ChatMessage, CompletionConfig, CompletionResponse, ProviderError, TokenUsage,
    };
    use async_trait::async_trait;

    struct MockProvider;

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            _config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: "mock response".to_string(),
                usage: TokenUsage::default(),
                model: "mock".to_string(),
                stop_reason: Some("stop".to_string()),
            })
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    struct MockProviderFactory;

    impl ProviderFactory for MockProviderFactory {
        fn provider_type(&self) -> &'static str {
            "mock"
        }

        fn api_key_env(&self) -> &'static str {
            "MOCK_API_KEY"
        }

        fn create(
            &self,
            _config: &LlmConfig,
            _credentials: &CredentialSet,
            _client: reqwest::Client,
        ) -> Result<Arc<dyn LlmProvider>, ConfigError> {
            Ok(Arc::new(MockProvider))
        }
    }

    #[test]
    fn test_defaults_registered() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(registry.available_types(), vec!["groq", "openai"]);
        assert_eq!(registry.factory("groq").unwrap().api_key_env(), "GROQ_API_KEY");
    }

    #[test]
    fn test_registry_register_and_create() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(MockProviderFactory));

        let config = LlmConfig {
            provider: "mock".to_string(),
            ..LlmConfig::default()
        };
        let provider = registry
            .create(&config, &CredentialSet::new(), reqwest::Client::new())
            .unwrap();
        assert_eq!(provider.name(), "mock");
    }

    #[test]
    fn test_registry_unknown_provider() {
        let registry = ProviderRegistry::with_defaults();
        let config = LlmConfig {
            provider: "unknown".to_string(),
            ..LlmConfig::default()
        };

        match registry.create(&config, &CredentialSet::new(), reqwest::Client::new()) {
            Err(ConfigError::UnknownProvider { name, available }) => {
                assert_eq!(name, "unknown");
                assert_eq!(available, vec!["groq".to_string(), "openai".to_string()]);
            }
            Err(other) => panic!("Expected UnknownProvider, got {other}"),
            Ok(_) => panic!("Expected UnknownProvider, got a provider"),
        }
    }
}
