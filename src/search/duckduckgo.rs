//! DuckDuckGo HTML search (no API key required)

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{SearchEngine, SearchError, SearchHit};
use crate::config::SearchConfig;
use crate::types::{AppError, AppResult};

const DUCKDUCKGO_HTML_BASE: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; shopwise/0.1)";

pub struct DuckDuckGoEngine {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoEngine {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        Self::with_endpoint(DUCKDUCKGO_HTML_BASE, timeout)
    }

    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn from_config(config: &SearchConfig) -> AppResult<Self> {
        Self::new(Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl SearchEngine for DuckDuckGoEngine {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        info!(query = %query, max_results, "Searching DuckDuckGo");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .header("Referer", "https://duckduckgo.com/")
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::RequestFailed(format!("DuckDuckGo returned {}", status)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let hits = parse_results(&html, max_results)?;
        if hits.is_empty() {
            warn!(query = %query, "DuckDuckGo returned no parsable results");
        }
        info!(count = hits.len(), "DuckDuckGo search completed");
        Ok(hits)
    }
}

fn parse_results(html: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
    debug!(bytes = html.len(), "Parsing DuckDuckGo HTML");

    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a.result__a")
        .map_err(|e| SearchError::ParseError(format!("result selector: {}", e)))?;
    let snippet_selector = Selector::parse(".result__snippet")
        .map_err(|e| SearchError::ParseError(format!("snippet selector: {}", e)))?;

    let mut hits = Vec::new();
    for element in document.select(&link_selector) {
        if hits.len() >= limit {
            break;
        }

        let href = element.value().attr("href").unwrap_or("");
        let url = match decode_redirect(href) {
            Some(url) => url,
            None => continue,
        };

        let snippet = element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .flat_map(|ancestor| ancestor.select(&snippet_selector))
            .map(|s| normalize_text(s.text()))
            .find(|text| !text.is_empty())
            .unwrap_or_default();

        hits.push(SearchHit {
            title: normalize_text(element.text()),
            url,
            snippet,
        });
    }

    Ok(hits)
}

/// Resolve DuckDuckGo's `/l/?uddg=` redirect links to the target URL
fn decode_redirect(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let parsed = url::Url::parse(&absolute).ok()?;
    if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
        return Some(target.into_owned());
    }

    matches!(parsed.scheme(), "http" | "https").then_some(absolute)
}

fn normalize_text<'a, I>(parts: I) -> String
where
    I: Iterator<Item = &'a str>,
{
    parts
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
