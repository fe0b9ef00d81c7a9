//! SerpAPI Client
//!
//! Google web search through SerpAPI. Shopping queries lean on `site:`
//! operators, which the plain Google engine honours, so organic results are
//! the only part of the response that is read.

use async_trait::async_trait;
use serpapi_search_rust::serp_api_search::SerpApiSearch;
use std::collections::HashMap;
use tracing::{debug, info};

use super::{SearchEngine, SearchError, SearchHit};

/// Google country code (`gl`); results target Indian retailers
const GOOGLE_COUNTRY: &str = "in";

/// SerpAPI client for product search
pub struct SerpApiClient {
    api_key: String,
    max_results: usize,
}

impl SerpApiClient {
    /// Create a new SerpAPI client
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            max_results: 10,
        }
    }

    /// Configure client from config
    pub fn from_config(config: &crate::config::SearchConfig) -> Option<Self> {
        if config.serpapi_key.trim().is_empty() {
            return None;
        }

        Some(Self::new(config.serpapi_key.clone()).with_max_results(config.max_results))
    }

    /// Set maximum results per search
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    fn params(&self, query: &str, num: usize) -> HashMap<String, String> {
        let mut params = HashMap::<String, String>::new();
        params.insert("engine".to_string(), "google".to_string());
        params.insert("q".to_string(), query.to_string());
        params.insert("hl".to_string(), "en".to_string());
        params.insert("gl".to_string(), GOOGLE_COUNTRY.to_string());
        params.insert("num".to_string(), num.to_string());
        params
    }
}

/// Pull organic results out of a SerpAPI response body
fn parse_organic_results(results: &serde_json::Value, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
    let organic = match results.get("organic_results") {
        Some(organic) => organic,
        // SerpAPI omits the key entirely when nothing matched
        None => return Ok(Vec::new()),
    };

    let results_array = organic
        .as_array()
        .ok_or_else(|| SearchError::ParseError("Expected array of results".to_string()))?;

    let hits = results_array
        .iter()
        .filter_map(|result| {
            let link = result.get("link").and_then(|v| v.as_str())?.to_string();
            let title = result
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or("Untitled")
                .to_string();
            let snippet = result
                .get("snippet")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            Some(SearchHit { title, url: link, snippet })
        })
        .take(limit)
        .collect();

    Ok(hits)
}

#[async_trait]
impl SearchEngine for SerpApiClient {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let limit = max_results.min(self.max_results);
        info!(query = %query, limit, "Searching Google via SerpAPI");

        let search = SerpApiSearch::google(self.params(query, limit), self.api_key.clone());

        let results = search
            .json()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        debug!("Raw SerpAPI response received");

        if let Some(error) = results.get("error").and_then(|v| v.as_str()) {
            return Err(SearchError::RequestFailed(error.to_string()));
        }

        let hits = parse_organic_results(&results, limit)?;
        info!(count = hits.len(), "SerpAPI search completed");
        Ok(hits)
    }
}
