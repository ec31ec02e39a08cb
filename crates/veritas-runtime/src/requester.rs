//! Sends the rendered prompt to the verdict model.

use std::sync::Arc;
use tracing::{debug, error};

use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};

/// One-shot completion client for verdict prompts.
///
/// The prompt goes out as a single user message. Failures are logged and
/// returned; there is no retry.
pub struct VerdictRequester {
    provider: Arc<dyn LlmProvider>,
    config: CompletionConfig,
}

impl VerdictRequester {
    /// Create a requester over `provider`.
    pub fn new(provider: Arc<dyn LlmProvider>, config: CompletionConfig) -> Self {
        Self { provider, config }
    }

    /// Request a verdict for `prompt` and return the model's raw answer.
    pub async fn request(&self, prompt: &str) -> Result<String, ProviderError> {
        let messages = vec![ChatMessage::user(prompt)];

        match self.provider.complete(messages, &self.config).await {
            Ok(response) => {
                debug!(
                    provider = self.provider.name(),
                    model = %response.model,
                    tokens = response.usage.total(),
                    stop_reason = ?response.stop_reason,
                    "Verdict received"
                );
                Ok(response.content)
            }
            Err(e) => {
                error!(provider = self.provider.name(), error = %e, "Verdict request failed");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for VerdictRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerdictRequester")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}
