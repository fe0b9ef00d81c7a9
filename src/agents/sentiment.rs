//! Review Sentiment Agent
//!
//! Reads one product page and summarizes its reviews. The scrape tool is
//! pinned to that single page.

use tracing::info;

use crate::generation::{GenerationRequest, Generator, ToolBinding};
use crate::scrape::ScrapeOptions;
use crate::types::AppResult;

pub const AGENT_NAME: &str = "Review Sentiment Agent";

pub struct SentimentAgent;

impl SentimentAgent {
    pub async fn run(generator: &dyn Generator, product_url: &str) -> AppResult<String> {
        info!(url = %product_url, "Starting review sentiment analysis");
        let generation = generator.generate(&Self::build_request(product_url)).await?;
        Ok(generation.content)
    }

    pub fn build_request(product_url: &str) -> GenerationRequest {
        let product_url = product_url.trim();
        let options = ScrapeOptions::default()
            .with_max_pages(1)
            .with_max_results(1)
            .with_chunk_chars(2000);

        GenerationRequest::new(AGENT_NAME, Self::instructions(), Self::compose_query(product_url))
            .with_tool(ToolBinding::scrape(options, vec![product_url.to_string()]))
    }

    fn instructions() -> Vec<String> {
        vec![
            "You are a sentiment analysis expert.".to_string(),
            "Extract short snippets of user reviews using the page scraping tool.".to_string(),
            "Classify each as Positive / Negative / Neutral.".to_string(),
            "Report counts and percentages for each sentiment.".to_string(),
            "List top 3 pros and top 3 cons in short bullets.".to_string(),
            "Conclude with a one-line verdict: Buy / Consider / Avoid.".to_string(),
            "Do NOT paste long raw review text. Keep everything brief.".to_string(),
            "Analyze at most 10 reviews if available.".to_string(),
        ]
    }

    fn compose_query(product_url: &str) -> String {
        format!(
            "Analyze user reviews from: {}\nExtract up to 10 concise snippets. Keep output compact and tabular/bulleted.",
            product_url
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingGenerator;

    #[tokio::test]
    async fn test_single_page_scenario() {
        let generator = RecordingGenerator::new("Verdict: Consider");
        let out = SentimentAgent::run(&generator, "https://example.com/p").await.unwrap();
        assert_eq!(out, "Verdict: Consider");

        let request = generator.last();
        let options = request.tool.as_ref().and_then(|t| t.scrape_options()).copied().unwrap();
        assert_eq!(options.max_pages, 1);
        assert_eq!(options.max_results, 1);

        let instructions = request.instructions.join("\n");
        assert!(instructions.contains("at most 10"));
        assert!(instructions.contains("Buy / Consider / Avoid"));
        assert!(instructions.contains("Positive / Negative / Neutral"));
        assert!(request.query.contains("https://example.com/p"));
    }

    #[test]
    fn test_tool_is_pinned_to_product_page() {
        let request = SentimentAgent::build_request("  https://www.amazon.in/dp/X  ");
        assert_eq!(
            request.tool,
            Some(ToolBinding::Scrape {
                options: ScrapeOptions {
                    max_pages: 1,
                    max_results: 1,
                    chunk_chars: 2000,
                    extract_readable: true,
                    include_links: true,
                },
                allowed_urls: vec!["https://www.amazon.in/dp/X".to_string()],
            })
        );
    }
}
