//! LLM Client: the single point of entry for all model calls in Lifeboard.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! Providers implement `LlmProvider`; `LlmGateway` is the only place a provider
//! is chosen. There is no retry and no cross-provider fallback: a failed call
//! surfaces as `GenerationFailed` carrying the provider name.
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::errors::AppError;
use crate::models::user::ProviderKind;

pub mod anthropic;
pub mod openai;
pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Provider-neutral completion request. Both providers receive the same
/// system prompt, token budget and temperature.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A text-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the text of the model's first completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Holds the configured providers and dispatches a request to exactly one.
#[derive(Clone, Default)]
pub struct LlmGateway {
    openai: Option<Arc<dyn LlmProvider>>,
    anthropic: Option<Arc<dyn LlmProvider>>,
}

impl LlmGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, kind: ProviderKind, provider: Arc<dyn LlmProvider>) -> Self {
        match kind {
            ProviderKind::OpenAi => self.openai = Some(provider),
            ProviderKind::Anthropic => self.anthropic = Some(provider),
        }
        self
    }

    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.provider(kind).is_some()
    }

    fn provider(&self, kind: ProviderKind) -> Option<&Arc<dyn LlmProvider>> {
        match kind {
            ProviderKind::OpenAi => self.openai.as_ref(),
            ProviderKind::Anthropic => self.anthropic.as_ref(),
        }
    }

    /// Sends the request to the selected provider and returns its raw text.
    pub async fn generate(
        &self,
        kind: ProviderKind,
        request: &CompletionRequest,
    ) -> Result<String, AppError> {
        let provider = self
            .provider(kind)
            .ok_or_else(|| AppError::GenerationFailed {
                provider: kind.as_str().to_string(),
                message: "provider is not configured".to_string(),
            })?;

        info!(
            "Calling {} (prompt {} chars, max_tokens={})",
            provider.name(),
            request.user_prompt.len(),
            request.max_tokens
        );

        provider
            .complete(request)
            .await
            .map_err(|e| AppError::GenerationFailed {
                provider: provider.name().to_string(),
                message: e.to_string(),
            })
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Provider stub that replays a fixed reply and records every request.
    pub struct ScriptedProvider {
        pub name: &'static str,
        pub reply: Result<String, String>,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub fn replying(name: &'static str, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Ok(reply.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub fn failing(name: &'static str, message: &str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.requests
                .lock()
                .unwrap()
                .last()
                .map(|r| r.user_prompt.clone())
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(LlmError::Api {
                    status: 503,
                    message: message.clone(),
                }),
            }
        }
    }
}
