//! Candidate URL Resolver
//!
//! Asks the search collaborator for a handful of shopping result URLs and
//! mines them out of whatever text comes back. The response is untrusted
//! free text; anything that is not a URL is ignored.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

use crate::search::WebSearch;
use crate::types::AppResult;

/// `http(s)://` then a run of non-space characters that are not quotes,
/// brackets or markdown markup (`*`, backtick, `|`), not ending in sentence
/// punctuation
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'()\[\]{}`*|]*[^\s<>"'()\[\]{}`*|.,;:!?]"#).expect("URL pattern compiles")
});

pub struct CandidateUrlResolver {
    search: Arc<dyn WebSearch>,
}

impl CandidateUrlResolver {
    pub fn new(search: Arc<dyn WebSearch>) -> Self {
        Self { search }
    }

    /// Resolve at most `k` candidate URLs for `query` with one search call.
    ///
    /// An empty result is not an error: callers fall back to answering
    /// without page constraints.
    pub async fn resolve(&self, query: &str, k: usize) -> AppResult<Vec<String>> {
        let instruction = search_instruction(query, k);
        info!(query = %query, k, "Resolving candidate URLs");

        let response = self.search.search(&instruction).await?;
        let urls = extract_urls(&response, k);

        debug!(response_len = response.len(), found = urls.len(), "Candidate URLs extracted");
        Ok(urls)
    }
}

/// Instruction sent to the search collaborator
pub fn search_instruction(query: &str, k: usize) -> String {
    format!(
        "Give top {} shopping result URLs for: {}. Only list URLs, one per line.",
        k, query
    )
}

/// Every URL in `text`, in order of appearance, capped at `k`
pub fn extract_urls(text: &str, k: usize) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .take(k)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `query site:a OR site:b ...`
pub fn site_query(query: &str, domains: &[&str]) -> String {
    let sites = domains
        .iter()
        .map(|d| format!("site:{}", d))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("{} {}", query.trim(), sites)
}

/// Like [`site_query`] with the query quoted for exact matching
pub fn exact_site_query(query: &str, domains: &[&str]) -> String {
    site_query(&format!("\"{}\"", query.trim()), domains)
}
