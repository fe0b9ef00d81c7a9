use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMProvider, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for LLM provider
pub struct LLMProviderConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    pub timeout: Duration,
}

/// Handle to one hosted model. Built once at startup and handed to every
/// component that generates text.
#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    provider: LLMProvider,
}

impl LLM {
    pub fn new(config: LLMProviderConfig) -> AppResult<Self> {
        let adapter: Arc<dyn LLMAdapter> = match config.provider {
            LLMProvider::Groq => Arc::new(crate::llm::groq::GroqAdapter::with_timeout(
                &config.api_key,
                config.timeout,
            )?),
            LLMProvider::OpenAI => Arc::new(crate::llm::openai::OpenAIAdapter::with_timeout(
                &config.api_key,
                crate::llm::openai::OPENAI_API_BASE,
                config.timeout,
            )?),
            LLMProvider::OpenRouter => Arc::new(
                crate::llm::openrouter::OpenRouterAdapter::with_timeout(&config.api_key, config.timeout)?,
            ),
        };

        Ok(Self {
            adapter,
            provider: config.provider,
        })
    }

    /// Build the handle for the configured provider
    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        let api_key = config.active_api_key().ok_or_else(|| {
            AppError::Config(format!("No API key configured for provider {}", config.provider))
        })?;

        Self::new(LLMProviderConfig {
            provider: config.provider,
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Wrap an existing adapter
    pub fn with_adapter(provider: LLMProvider, adapter: Arc<dyn LLMAdapter>) -> Self {
        Self { adapter, provider }
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}
