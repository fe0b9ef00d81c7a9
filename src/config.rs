use anyhow::Result;
use serde::Deserialize;
use std::env;

use crate::llm::groq::DEFAULT_MODEL;
use crate::scrape::firecrawl::FIRECRAWL_API_BASE;
use crate::search::SearchEngineKind;
use crate::types::LLMProvider;
use crate::utils::DEFAULT_MAX_CHARS;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub search: SearchConfig,
    pub scrape: ScrapeConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub model: String,
    pub groq_api_key: String,
    pub openai_api_key: String,
    pub openrouter_api_key: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Tool call round trips allowed before the model must answer in text
    pub max_tool_rounds: usize,
    pub timeout_secs: u64,
}

impl LLMConfig {
    /// API key for the configured provider, if one is set
    pub fn active_api_key(&self) -> Option<String> {
        let key = match self.provider {
            LLMProvider::Groq => &self.groq_api_key,
            LLMProvider::OpenAI => &self.openai_api_key,
            LLMProvider::OpenRouter => &self.openrouter_api_key,
        };
        if key.trim().is_empty() {
            None
        } else {
            Some(key.clone())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub engine: SearchEngineKind,
    pub serpapi_key: String,
    pub max_results: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    pub firecrawl_api_key: String,
    pub firecrawl_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Character budget for every rendered result
    pub max_chars: usize,
    pub currency: String,
    pub region: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: var_or("PORT", "8501").parse()?,
                host: var_or("HOST", "0.0.0.0"),
                cors_allowed_origins: var_or("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            llm: LLMConfig {
                provider: var_or("LLM_PROVIDER", "groq").parse()?,
                model: var_or("LLM_MODEL", DEFAULT_MODEL),
                groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
                openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                openrouter_api_key: env::var("OPENROUTER_API_KEY").unwrap_or_default(),
                temperature: var_or("LLM_TEMPERATURE", "0.3").parse()?,
                max_tokens: var_or("LLM_MAX_TOKENS", "2048").parse()?,
                max_tool_rounds: var_or("LLM_MAX_TOOL_ROUNDS", "4").parse()?,
                timeout_secs: var_or("LLM_TIMEOUT_SECS", "120").parse()?,
            },
            search: SearchConfig {
                engine: var_or("SEARCH_ENGINE", "duckduckgo").parse()?,
                serpapi_key: env::var("SERPAPI_API_KEY").unwrap_or_default(),
                max_results: var_or("SEARCH_MAX_RESULTS", "10").parse()?,
                timeout_secs: var_or("SEARCH_TIMEOUT_SECS", "15").parse()?,
            },
            scrape: ScrapeConfig {
                firecrawl_api_key: env::var("FIRECRAWL_API_KEY").unwrap_or_default(),
                firecrawl_base_url: var_or("FIRECRAWL_BASE_URL", FIRECRAWL_API_BASE),
                timeout_secs: var_or("FIRECRAWL_TIMEOUT_SECS", "60").parse()?,
            },
            display: DisplayConfig {
                max_chars: var_or("DISPLAY_MAX_CHARS", &DEFAULT_MAX_CHARS.to_string()).parse()?,
                currency: var_or("DEFAULT_CURRENCY", "₹ INR"),
                region: var_or("DEFAULT_REGION", "India"),
            },
        })
    }
}
