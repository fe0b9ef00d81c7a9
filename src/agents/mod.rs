//! Shopping Agents
//!
//! One agent per user action. Every web agent follows the same shape:
//!
//! ```text
//! user input
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Resolver   │  → at most 5 candidate URLs (one search call)
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │ Generation  │  → scrape tool limited to the candidates
//! └─────────────┘
//!      │
//!      ▼
//!  result text
//! ```
//!
//! Sentiment skips the resolver (the user supplies the page), trending runs
//! without an allow-list and the buying guide has no tool at all.
//! [`ShoppingAssistant`] wraps all five and turns any failure into
//! `Error in <task>: <message>`.

pub mod buying_guide;
pub mod comparison;
pub mod recommendation;
pub mod resolver;
pub mod sentiment;
pub mod trending;

pub use buying_guide::BuyingGuideAgent;
pub use comparison::ComparisonAgent;
pub use recommendation::{Priority, RecommendationAgent, RecommendationInput};
pub use resolver::CandidateUrlResolver;
pub use sentiment::SentimentAgent;
pub use trending::TrendingAgent;

use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::generation::{Generator, ToolBinding};
use crate::scrape::ScrapeOptions;
use crate::search::WebSearch;
use crate::types::AppResult;
use crate::utils::clamp;

/// Candidate URLs requested from the resolver
pub const CANDIDATE_COUNT: usize = 5;

/// Characters of an error message kept in the rendered error line
const MAX_ERROR_CHARS: usize = 300;

/// Page budget when no candidates were resolved
const UNCONSTRAINED_MAX_RESULTS: usize = 5;

/// Stands in for the URL list when the resolver found nothing
pub const NO_SOURCES_CLAUSE: &str = "None found; no sources were found.";

pub const NO_SOURCES_INSTRUCTION: &str =
    "No source URLs were found: answer from general knowledge and say that no sources were found.";

/// Newline-separated `urls`, or the no-sources clause followed by `hint`
pub(crate) fn url_block(urls: &[String], hint: &str) -> String {
    if urls.is_empty() {
        format!("{} {}", NO_SOURCES_CLAUSE, hint)
    } else {
        urls.join("\n")
    }
}

/// Scrape tool restricted to `urls`, one page per call
pub(crate) fn scrape_tool(urls: &[String], chunk_chars: usize) -> ToolBinding {
    let max_results = if urls.is_empty() {
        UNCONSTRAINED_MAX_RESULTS
    } else {
        urls.len()
    };
    let options = ScrapeOptions::default()
        .with_max_pages(1)
        .with_max_results(max_results)
        .with_chunk_chars(chunk_chars);
    ToolBinding::scrape(options, urls.to_vec())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchTask {
    ProductResearch,
    SentimentAnalysis,
    BuyingGuide,
    ProductComparison,
    TrendingProducts,
}

impl ResearchTask {
    pub fn label(&self) -> &'static str {
        match self {
            ResearchTask::ProductResearch => "product research",
            ResearchTask::SentimentAnalysis => "sentiment analysis",
            ResearchTask::BuyingGuide => "buying guide",
            ResearchTask::ProductComparison => "product comparison",
            ResearchTask::TrendingProducts => "trending products",
        }
    }
}

impl std::fmt::Display for ResearchTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Runs the agents and contains their failures.
///
/// Every method returns the agent's text or a single
/// `Error in <task>: <message>` line. Nothing is retried.
pub struct ShoppingAssistant {
    generator: Arc<dyn Generator>,
    resolver: CandidateUrlResolver,
}

impl ShoppingAssistant {
    pub fn new(generator: Arc<dyn Generator>, search: Arc<dyn WebSearch>) -> Self {
        Self {
            generator,
            resolver: CandidateUrlResolver::new(search),
        }
    }

    pub async fn recommend(&self, input: &RecommendationInput) -> String {
        contain(
            ResearchTask::ProductResearch,
            RecommendationAgent::run(self.generator.as_ref(), &self.resolver, input),
        )
        .await
    }

    pub async fn analyze_reviews(&self, product_url: &str) -> String {
        contain(
            ResearchTask::SentimentAnalysis,
            SentimentAgent::run(self.generator.as_ref(), product_url),
        )
        .await
    }

    pub async fn buying_guide(&self, product_type: &str) -> String {
        contain(
            ResearchTask::BuyingGuide,
            BuyingGuideAgent::run(self.generator.as_ref(), product_type),
        )
        .await
    }

    pub async fn compare(&self, product_name: &str) -> String {
        contain(
            ResearchTask::ProductComparison,
            ComparisonAgent::run(self.generator.as_ref(), &self.resolver, product_name),
        )
        .await
    }

    pub async fn trending(&self) -> String {
        contain(
            ResearchTask::TrendingProducts,
            TrendingAgent::run(self.generator.as_ref()),
        )
        .await
    }
}

async fn contain<F>(task: ResearchTask, action: F) -> String
where
    F: Future<Output = AppResult<String>>,
{
    let span = tracing::info_span!("action", task = %task, id = %Uuid::new_v4());
    async move {
        match action.await {
            Ok(content) => {
                info!(content_len = content.len(), "Action complete");
                content
            }
            Err(e) => {
                error!(error = %e, "Action failed");
                format!("Error in {}: {}", task, error_line(&e.to_string()))
            }
        }
    }
    .instrument(span)
    .await
}

/// `message` on one line with runs of whitespace collapsed, clamped
fn error_line(message: &str) -> String {
    let collapsed = message.split_whitespace().collect::<Vec<_>>().join(" ");
    clamp(Some(&collapsed), MAX_ERROR_CHARS)
}
