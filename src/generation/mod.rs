//! Generation
//!
//! One generation call per user action: ordered instructions, an optional
//! bound tool and a composed query go in, one text result comes out.
//! [`LlmGenerator`] implements it as a tool-calling loop against a hosted
//! model.

pub mod tool_loop;
pub mod tools;

pub use tool_loop::LlmGenerator;
pub use tools::ToolRuntime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::scrape::ScrapeOptions;
use crate::types::AppResult;

/// Tool the model may use during one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolBinding {
    /// Page extraction. A non-empty `allowed_urls` restricts the tool to those pages.
    Scrape {
        options: ScrapeOptions,
        allowed_urls: Vec<String>,
    },
    /// Web search returning at most `max_results` hits per call
    WebSearch { max_results: usize },
}

impl ToolBinding {
    pub fn scrape(options: ScrapeOptions, allowed_urls: Vec<String>) -> Self {
        ToolBinding::Scrape { options, allowed_urls }
    }

    pub fn scrape_options(&self) -> Option<&ScrapeOptions> {
        match self {
            ToolBinding::Scrape { options, .. } => Some(options),
            ToolBinding::WebSearch { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Agent name, for logs
    pub agent: String,
    pub instructions: Vec<String>,
    pub tool: Option<ToolBinding>,
    pub query: String,
}

impl GenerationRequest {
    pub fn new(agent: impl Into<String>, instructions: Vec<String>, query: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            instructions,
            tool: None,
            query: query.into(),
        }
    }

    pub fn with_tool(mut self, tool: ToolBinding) -> Self {
        self.tool = Some(tool);
        self
    }

    /// Instructions joined the way the model sees them
    pub fn system_prompt(&self) -> String {
        self.instructions
            .iter()
            .map(|line| format!("- {}", line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub content: String,
    /// Tool calls executed while producing `content`
    pub tool_calls: usize,
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Generation>;
}
