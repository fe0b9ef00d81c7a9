//! Search through a model with a web search tool.
//!
//! The model runs the `web_search` tool and answers the instruction in its
//! own words, so the returned text has no guaranteed structure.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::WebSearch;
use crate::generation::{GenerationRequest, Generator, ToolBinding};
use crate::types::AppResult;

const SEARCH_AGENT: &str = "Search";

pub struct AgentWebSearch {
    generator: Arc<dyn Generator>,
    max_results: usize,
}

impl AgentWebSearch {
    pub fn new(generator: Arc<dyn Generator>, max_results: usize) -> Self {
        Self { generator, max_results }
    }

    fn instructions() -> Vec<String> {
        vec![
            "You find shopping pages on the web using the web_search tool.".to_string(),
            "Copy URLs exactly as they appear in the search results.".to_string(),
            "Prefer product listing pages over blogs and reviews.".to_string(),
        ]
    }
}

#[async_trait]
impl WebSearch for AgentWebSearch {
    async fn search(&self, instruction: &str) -> AppResult<String> {
        info!(instruction_len = instruction.len(), "Running search agent");
        let request = GenerationRequest::new(SEARCH_AGENT, Self::instructions(), instruction)
            .with_tool(ToolBinding::WebSearch {
                max_results: self.max_results,
            });
        let generation = self.generator.generate(&request).await?;
        Ok(generation.content)
    }
}
