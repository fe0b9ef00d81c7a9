//! Trending Product Finder
//!
//! Lists current deals under a fixed price ceiling for the Indian market.
//! No user input and no URL pre-selection.

use tracing::info;

use crate::generation::{GenerationRequest, Generator, ToolBinding};
use crate::scrape::ScrapeOptions;
use crate::types::AppResult;

pub const AGENT_NAME: &str = "Trending Product Finder";

/// Price ceiling for trending items
pub const PRICE_CEILING: &str = "₹1000";

pub struct TrendingAgent;

impl TrendingAgent {
    pub async fn run(generator: &dyn Generator) -> AppResult<String> {
        info!(ceiling = PRICE_CEILING, "Finding trending products");
        let generation = generator.generate(&Self::build_request()).await?;
        Ok(generation.content)
    }

    pub fn build_request() -> GenerationRequest {
        let options = ScrapeOptions::default()
            .with_max_pages(1)
            .with_max_results(8)
            .with_chunk_chars(2000);

        GenerationRequest::new(
            AGENT_NAME,
            vec![
                format!("Find trending products under {} from major e-commerce sites.", PRICE_CEILING),
                "Return at most 8 items. Keep each item to one line: Name | Typical Price | 2 key points | Source URL."
                    .to_string(),
                "Prefer recent deals pages; avoid long descriptions.".to_string(),
            ],
            format!(
                "Trending under {} in India across Amazon/Flipkart/others. Keep concise.",
                PRICE_CEILING
            ),
        )
        .with_tool(ToolBinding::scrape(options, Vec::new()))
    }
}
