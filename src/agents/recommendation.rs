//! Product Research Agent
//!
//! Finds the best products for a shopping list within a budget, reading only
//! Amazon India and Flipkart pages picked by the candidate URL resolver.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::resolver::{site_query, CandidateUrlResolver};
use super::{scrape_tool, url_block, CANDIDATE_COUNT, NO_SOURCES_INSTRUCTION};
use crate::generation::{GenerationRequest, Generator};
use crate::types::{AppError, AppResult};

pub const AGENT_NAME: &str = "Product Research Agent";

/// Retail domains searched for recommendations
pub const RETAIL_DOMAINS: &[&str] = &["amazon.in", "flipkart.com"];

/// Optimization strategy for recommendations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    #[serde(rename = "Best Value")]
    BestValue,
    #[serde(rename = "Premium Quality")]
    PremiumQuality,
    #[serde(rename = "Budget Conscious")]
    BudgetConscious,
    #[serde(rename = "Latest Technology")]
    LatestTechnology,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::BestValue,
        Priority::PremiumQuality,
        Priority::BudgetConscious,
        Priority::LatestTechnology,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::BestValue => "Best Value",
            Priority::PremiumQuality => "Premium Quality",
            Priority::BudgetConscious => "Budget Conscious",
            Priority::LatestTechnology => "Latest Technology",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Priority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                AppError::InvalidRequest(format!(
                    "Unknown priority '{}'. Choose one of: Best Value, Premium Quality, Budget Conscious, Latest Technology",
                    wanted
                ))
            })
    }
}

/// Validated recommendation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationInput {
    pub shopping_list: String,
    pub budget: u32,
    pub priority: Priority,
}

pub struct RecommendationAgent;

impl RecommendationAgent {
    pub async fn run(
        generator: &dyn Generator,
        resolver: &CandidateUrlResolver,
        input: &RecommendationInput,
    ) -> AppResult<String> {
        info!(
            budget = input.budget,
            priority = %input.priority,
            "Starting product research"
        );

        let candidate_query = site_query(&input.shopping_list, RETAIL_DOMAINS);
        let urls = resolver.resolve(&candidate_query, CANDIDATE_COUNT).await?;
        info!(url_count = urls.len(), "Candidate listings resolved");

        let request = Self::build_request(input, &urls);
        let generation = generator.generate(&request).await?;
        Ok(generation.content)
    }

    pub fn build_request(input: &RecommendationInput, urls: &[String]) -> GenerationRequest {
        GenerationRequest::new(AGENT_NAME, Self::instructions(input.priority, urls), Self::compose_query(input, urls))
            .with_tool(scrape_tool(urls, 2500))
    }

    fn instructions(priority: Priority, urls: &[String]) -> Vec<String> {
        let mut instructions = vec![
            "You find the best products within the user's budget.".to_string(),
            "Analyze ONLY the URLs provided. Ignore other sources.".to_string(),
            "Return at most 5 products TOTAL across all sites.".to_string(),
            "Per product (single compact block): Name | Price | 3 key features | Source URL.".to_string(),
            "No raw HTML, no long quotes, no full review dumps.".to_string(),
            format!("Optimization priority: {}.", priority),
            "End with: Total estimated cost and whether it's within budget.".to_string(),
        ];
        if urls.is_empty() {
            instructions.push(NO_SOURCES_INSTRUCTION.to_string());
        }
        instructions
    }

    fn compose_query(input: &RecommendationInput, urls: &[String]) -> String {
        format!(
            "Analyze ONLY these URLs:\n{}\n\nShopping List: {}\nBudget: ₹{}\nPriority: {}\n\
             Sites: prefer Amazon India and Flipkart. Keep output concise and structured.",
            url_block(urls, "Recommend from well-known products instead."),
            input.shopping_list.trim(),
            input.budget,
            input.priority
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::NO_SOURCES_CLAUSE;
    use crate::generation::ToolBinding;
    use crate::testing::{RecordingGenerator, StaticSearch};
    use std::sync::Arc;

    fn input() -> RecommendationInput {
        RecommendationInput {
            shopping_list: "wireless headphones, ergonomic mouse".to_string(),
            budget: 5000,
            priority: Priority::BudgetConscious,
        }
    }

    #[tokio::test]
    async fn test_budget_conscious_scenario() {
        let search = Arc::new(StaticSearch::new(
            "https://www.amazon.in/dp/H1\nhttps://www.flipkart.com/mouse/M2",
        ));
        let resolver = CandidateUrlResolver::new(search.clone());
        let generator = RecordingGenerator::new("1. Boat Rockerz | ₹1,499 | ...");

        let out = RecommendationAgent::run(&generator, &resolver, &input()).await.unwrap();
        assert_eq!(out, "1. Boat Rockerz | ₹1,499 | ...");

        let instruction = &search.instructions()[0];
        assert!(instruction.contains("site:amazon.in OR site:flipkart.com"));
        assert!(instruction.starts_with("Give top 5 shopping result URLs"));

        let request = generator.last();
        let instructions = request.instructions.join("\n");
        assert!(instructions.contains("at most 5 products TOTAL"));
        assert!(instructions.contains("Budget Conscious"));
        assert!(request.query.contains("https://www.amazon.in/dp/H1\nhttps://www.flipkart.com/mouse/M2"));
        assert!(request.query.contains("Budget: ₹5000"));

        match request.tool {
            Some(ToolBinding::Scrape { options, allowed_urls }) => {
                assert_eq!(options.max_pages, 1);
                assert_eq!(options.max_results, 2);
                assert_eq!(options.chunk_chars, 2500);
                assert_eq!(allowed_urls.len(), 2);
            }
            other => panic!("unexpected tool binding: {:?}", other),
        }
    }

    #[test]
    fn test_no_urls_uses_fallback_clause() {
        let request = RecommendationAgent::build_request(&input(), &[]);
        assert!(request.query.contains(NO_SOURCES_CLAUSE));
        assert!(request.instructions.iter().any(|i| i == NO_SOURCES_INSTRUCTION));
        assert_eq!(request.tool.as_ref().and_then(|t| t.scrape_options()).map(|o| o.max_results), Some(5));
    }

    #[test]
    fn test_priority_parse_and_display() {
        assert_eq!("budget conscious".parse::<Priority>().unwrap(), Priority::BudgetConscious);
        assert_eq!(Priority::LatestTechnology.to_string(), "Latest Technology");
        assert!("Cheapest".parse::<Priority>().is_err());
        let json = serde_json::to_string(&Priority::PremiumQuality).unwrap();
        assert_eq!(json, "\"Premium Quality\"");
    }
}
