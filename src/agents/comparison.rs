//! Product Comparison Agent
//!
//! Compares listings of one named product across Amazon India, Flipkart and
//! Reliance Digital.

use tracing::info;

use super::resolver::{exact_site_query, CandidateUrlResolver};
use super::{scrape_tool, url_block, CANDIDATE_COUNT, NO_SOURCES_INSTRUCTION};
use crate::generation::{GenerationRequest, Generator};
use crate::types::AppResult;

pub const AGENT_NAME: &str = "Product Comparison Agent";

/// Retail domains searched for comparisons
pub const RETAIL_DOMAINS: &[&str] = &["amazon.in", "flipkart.com", "reliancedigital.in"];

pub struct ComparisonAgent;

impl ComparisonAgent {
    pub async fn run(
        generator: &dyn Generator,
        resolver: &CandidateUrlResolver,
        product_name: &str,
    ) -> AppResult<String> {
        info!(product = %product_name, "Starting product comparison");

        let urls = resolver
            .resolve(&exact_site_query(product_name, RETAIL_DOMAINS), CANDIDATE_COUNT)
            .await?;
        info!(url_count = urls.len(), "Comparison listings resolved");

        let generation = generator.generate(&Self::build_request(product_name, &urls)).await?;
        Ok(generation.content)
    }

    pub fn build_request(product_name: &str, urls: &[String]) -> GenerationRequest {
        GenerationRequest::new(AGENT_NAME, Self::instructions(urls), Self::compose_query(product_name, urls))
            .with_tool(scrape_tool(urls, 2500))
    }

    fn instructions(urls: &[String]) -> Vec<String> {
        let mut instructions = vec![
            "Compare products across the provided URLs.".to_string(),
            "Return at most 5 variants total.".to_string(),
            "Per product: Name | Price | Key differentiators (3 bullets) | Source URL.".to_string(),
            "End with: Best pick and 1-sentence rationale.".to_string(),
            "No long quotes, specs tables should be compact.".to_string(),
        ];
        if urls.is_empty() {
            instructions.push(NO_SOURCES_INSTRUCTION.to_string());
        }
        instructions
    }

    fn compose_query(product_name: &str, urls: &[String]) -> String {
        format!(
            "Compare ONLY these links (ignore others):\n{}\n\nTarget product: {}\nKeep output compact.",
            url_block(urls, "Compare top known variants briefly."),
            product_name.trim()
        )
    }
}
