//! Search Module
//!
//! Web search for candidate product pages:
//! - [`WebSearch`]: the instruction-in, free-text-out collaborator the
//!   candidate URL resolver talks to
//! - [`SearchEngine`]: a concrete engine returning structured hits, exposed
//!   to the model as the `web_search` tool
//!
//! Engines: DuckDuckGo HTML results (no key) and SerpAPI's Google engine.

pub mod agent;
pub mod duckduckgo;
pub mod serpapi;

pub use agent::AgentWebSearch;
pub use duckduckgo::DuckDuckGoEngine;
pub use serpapi::SerpApiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::config::SearchConfig;
use crate::types::{AppError, AppResult};

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("SerpAPI key not configured")]
    NoApiKey,

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),
}

/// One organic search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchHit {
    /// Plain text form handed back to the model
    pub fn render(&self) -> String {
        if self.snippet.is_empty() {
            format!("{}\n  {}", self.title, self.url)
        } else {
            format!("{}\n  {}\n  {}", self.title, self.url, self.snippet)
        }
    }
}

/// Render hits as a numbered list
pub fn render_hits(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No results found for: {}", query);
    }
    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("{}. {}", i + 1, hit.render()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Free-text search collaborator.
///
/// Receives a natural-language instruction and returns whatever text the
/// backend produced. Callers must treat the output as untrusted.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, instruction: &str) -> AppResult<String>;
}

/// A concrete web search engine
#[async_trait]
pub trait SearchEngine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngineKind {
    DuckDuckGo,
    SerpApi,
}

impl std::str::FromStr for SearchEngineKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "duckduckgo" | "ddg" => Ok(SearchEngineKind::DuckDuckGo),
            "serpapi" | "google" => Ok(SearchEngineKind::SerpApi),
            other => Err(AppError::Config(format!("Unsupported search engine: {}", other))),
        }
    }
}

/// Build the configured engine
pub fn engine_from_config(config: &SearchConfig) -> AppResult<Arc<dyn SearchEngine>> {
    match config.engine {
        SearchEngineKind::DuckDuckGo => Ok(Arc::new(DuckDuckGoEngine::from_config(config)?)),
        SearchEngineKind::SerpApi => {
            let client = SerpApiClient::from_config(config).ok_or(SearchError::NoApiKey)?;
            Ok(Arc::new(client))
        }
    }
}
