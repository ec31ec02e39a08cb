//! OpenAI-compatible chat-completions provider.
//!
//! Groq and OpenAI expose the same `/chat/completions` protocol, so one
//! provider type serves both; the registered factories differ only in
//! default base URL and the environment variable holding the key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::{
    factory::ProviderFactory, ChatMessage, CompletionConfig, CompletionResponse, LlmProvider,
    ProviderError, TokenUsage,
};
use crate::config::{ConfigError, LlmConfig};
use crate::secrets::{ApiCredential, CredentialSet};

/// Environment variable name for the Groq API key.
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable name for the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions provider.
///
/// The API key is held as an [`ApiCredential`] and is exposed only when
/// the `Authorization` header is built.
pub struct ChatCompletionsProvider {
    name: String,
    credential: Arc<ApiCredential>,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for ChatCompletionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsProvider")
            .field("name", &self.name)
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ChatCompletionsProvider {
    /// Create a provider against `base_url` (e.g. `https://api.groq.com/openai/v1`).
    pub fn new(
        name: impl Into<String>,
        credential: Arc<ApiCredential>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            name: name.into(),
            credential,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// The API base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Chat-completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Chat-completions response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl LlmProvider for ChatCompletionsProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = ChatRequest {
            model: &config.model,
            messages: &messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        // SECURITY: Only expose the credential here, at the point of use
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.credential.expose())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::AuthError);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);

            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmptyResponse("no choices returned".to_string()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| ProviderError::EmptyResponse("choice has no content".to_string()))?;

        let usage = body
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            model: body.model,
            stop_reason: choice.finish_reason,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Factory for OpenAI-compatible providers.
///
/// Configuration is read from [`LlmConfig`]: `base_url` overrides the
/// vendor default.
#[derive(Debug, Clone)]
pub struct ChatCompletionsFactory {
    provider_type: &'static str,
    api_key_env: &'static str,
    default_base_url: &'static str,
    description: &'static str,
}

impl ChatCompletionsFactory {
    /// Groq (default provider).
    pub fn groq() -> Self {
        Self {
            provider_type: "groq",
            api_key_env: GROQ_API_KEY_ENV,
            default_base_url: GROQ_BASE_URL,
            description: "Groq chat completions (OpenAI-compatible)",
        }
    }

    /// OpenAI.
    pub fn openai() -> Self {
        Self {
            provider_type: "openai",
            api_key_env: OPENAI_API_KEY_ENV,
            default_base_url: OPENAI_BASE_URL,
            description: "OpenAI chat completions",
        }
    }
}

impl ProviderFactory for ChatCompletionsFactory {
    fn provider_type(&self) -> &'static str {
        self.provider_type
    }

    fn api_key_env(&self) -> &'static str {
        self.api_key_env
    }

    fn create(
        &self,
        config: &LlmConfig,
        credentials: &CredentialSet,
        client: reqwest::Client,
    ) -> Result<Arc<dyn LlmProvider>, ConfigError> {
        let credential = credentials.get(self.api_key_env)?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| self.default_base_url.to_string());

        Ok(Arc::new(ChatCompletionsProvider::new(
            self.provider_type,
            credential,
            base_url,
            client,
        )))
    }

    fn description(&self) -> &'static str {
        self.description
    }
}
