// Shopwise - AI shopping assistant backed by bounded web research

pub mod agents;
pub mod config;
pub mod generation;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod scrape;
pub mod search;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use tracing::{info, warn};

pub use agents::ShoppingAssistant;
pub use config::Config;
pub use models::AppState;

use generation::{Generator, LlmGenerator};
use llm::LLM;
use scrape::FirecrawlClient;
use search::{engine_from_config, AgentWebSearch, SearchEngine};
use types::AppResult;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}

/// Wire the model, search engine and scraper into one assistant.
///
/// Without a Firecrawl key the assistant still starts; actions that need the
/// scrape tool then report an error and the buying guide keeps working.
pub fn build_assistant(config: &Config) -> AppResult<ShoppingAssistant> {
    let llm = LLM::from_config(&config.llm)?;
    let engine = engine_from_config(&config.search)?;
    info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        search_engine = engine.name(),
        "Building shopping assistant"
    );

    let mut generator = LlmGenerator::from_config(llm, &config.llm).with_search_engine(engine);
    match FirecrawlClient::from_config(&config.scrape)? {
        Some(client) => generator = generator.with_scraper(Arc::new(client)),
        None => warn!("FIRECRAWL_API_KEY not set; page scraping is unavailable"),
    }

    let generator: Arc<dyn Generator> = Arc::new(generator);
    let search = Arc::new(AgentWebSearch::new(generator.clone(), config.search.max_results));
    Ok(ShoppingAssistant::new(generator, search))
}
