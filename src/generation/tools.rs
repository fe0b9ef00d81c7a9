//! Tools exposed to the model during a generation, with their budgets.
//!
//! Policy refusals (a URL outside the allowed set, an exhausted page budget,
//! malformed arguments) are reported back to the model as tool output.
//! Backend failures propagate and end the generation.

use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::ToolBinding;
use crate::scrape::{PageScraper, ScrapeOptions, ScrapedPage};
use crate::search::{render_hits, SearchEngine};
use crate::types::{AppError, AppResult, ToolCall, ToolDefinition};
use crate::utils::text::clamp;

pub const SCRAPE_TOOL: &str = "scrape_pages";
pub const SEARCH_TOOL: &str = "web_search";

/// Outgoing links listed per scraped page
const MAX_LINKS_PER_PAGE: usize = 15;

/// A bound tool plus the state of its budget for one generation
pub enum ToolRuntime {
    Scrape(ScrapeRuntime),
    Search(SearchRuntime),
}

pub struct ScrapeRuntime {
    scraper: Arc<dyn PageScraper>,
    options: ScrapeOptions,
    allowed_urls: Vec<String>,
    pages_used: usize,
}

pub struct SearchRuntime {
    engine: Arc<dyn SearchEngine>,
    max_results: usize,
}

#[derive(Deserialize)]
struct ScrapeArgs {
    #[serde(default)]
    urls: Vec<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
}

/// Comparison form of a URL: no surrounding markdown markup, no trailing `/`
fn normalize_url(url: &str) -> &str {
    url.trim()
        .trim_matches(|c| matches!(c, '*' | '`' | '|' | '<' | '>'))
        .trim_end_matches('/')
}

impl ToolRuntime {
    /// Bind `binding` to a backend. Fails when the backend is not configured.
    pub fn bind(
        binding: &ToolBinding,
        scraper: Option<&Arc<dyn PageScraper>>,
        engine: Option<&Arc<dyn SearchEngine>>,
    ) -> AppResult<Self> {
        match binding {
            ToolBinding::Scrape { options, allowed_urls } => {
                let scraper = scraper
                    .ok_or_else(|| AppError::Config("No page scraper configured".to_string()))?;
                let options = options.apply(&scraper.supported_options());
                debug!(?options, allowed = allowed_urls.len(), "Scrape tool bound");
                Ok(ToolRuntime::Scrape(ScrapeRuntime {
                    scraper: Arc::clone(scraper),
                    options,
                    allowed_urls: allowed_urls.clone(),
                    pages_used: 0,
                }))
            }
            ToolBinding::WebSearch { max_results } => {
                let engine = engine
                    .ok_or_else(|| AppError::Config("No search engine configured".to_string()))?;
                Ok(ToolRuntime::Search(SearchRuntime {
                    engine: Arc::clone(engine),
                    max_results: *max_results,
                }))
            }
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        match self {
            ToolRuntime::Scrape(rt) => rt.definition(),
            ToolRuntime::Search(rt) => rt.definition(),
        }
    }

    /// Run one tool call and return the text fed back to the model
    pub async fn execute(&mut self, call: &ToolCall) -> AppResult<String> {
        let expected = match self {
            ToolRuntime::Scrape(_) => SCRAPE_TOOL,
            ToolRuntime::Search(_) => SEARCH_TOOL,
        };
        if call.name != expected {
            warn!(tool = %call.name, "Model called an unbound tool");
            return Ok(format!("Unknown tool: {}. The only available tool is {}.", call.name, expected));
        }

        match self {
            ToolRuntime::Scrape(rt) => rt.execute(&call.arguments).await,
            ToolRuntime::Search(rt) => rt.execute(&call.arguments).await,
        }
    }
}

impl ScrapeRuntime {
    pub fn options(&self) -> &ScrapeOptions {
        &self.options
    }

    fn definition(&self) -> ToolDefinition {
        let mut description = format!(
            "Fetch the readable text of up to {} product page(s) per call, {} page(s) in total.",
            self.options.max_pages, self.options.max_results
        );
        if !self.allowed_urls.is_empty() {
            description.push_str(" Only these URLs may be fetched: ");
            description.push_str(&self.allowed_urls.join(", "));
        }

        ToolDefinition {
            name: SCRAPE_TOOL.to_string(),
            description,
            parameters: json!({
                "type": "object",
                "properties": {
                    "urls": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Page URLs to fetch"
                    }
                },
                "required": ["urls"]
            }),
        }
    }

    fn is_allowed(&self, url: &str) -> bool {
        self.allowed_urls.is_empty()
            || self
                .allowed_urls
                .iter()
                .any(|allowed| normalize_url(allowed) == normalize_url(url))
    }

    async fn execute(&mut self, arguments: &str) -> AppResult<String> {
        let args: ScrapeArgs = match serde_json::from_str(arguments) {
            Ok(args) => args,
            Err(e) => return Ok(format!("Invalid arguments for {}: {}", SCRAPE_TOOL, e)),
        };

        let mut requested = args.urls;
        requested.extend(args.url);
        if requested.is_empty() {
            return Ok("No URLs given. Pass the pages to fetch in `urls`.".to_string());
        }

        let mut sections = Vec::new();
        let mut fetched_this_call = 0;

        for url in &requested {
            if !self.is_allowed(url) {
                warn!(url = %url, "Refused scrape outside the candidate set");
                sections.push(format!("Refused {}: not one of the allowed source URLs.", url));
                continue;
            }
            if self.pages_used >= self.options.max_results {
                sections.push(format!(
                    "Page budget of {} exhausted; answer with the pages already read.",
                    self.options.max_results
                ));
                break;
            }
            if fetched_this_call >= self.options.max_pages {
                sections.push(format!(
                    "Skipped {}: at most {} page(s) per call.",
                    url, self.options.max_pages
                ));
                continue;
            }

            let page = self.scraper.scrape(url, &self.options).await?;
            self.pages_used += 1;
            fetched_this_call += 1;
            sections.push(self.render_page(&page));
        }

        info!(
            fetched = fetched_this_call,
            pages_used = self.pages_used,
            budget = self.options.max_results,
            "Scrape tool call finished"
        );
        Ok(sections.join("\n\n"))
    }

    fn render_page(&self, page: &ScrapedPage) -> String {
        let mut out = format!("--- Page: {} ---\n", page.url);
        if let Some(title) = page.title.as_deref().filter(|t| !t.is_empty()) {
            out.push_str(&format!("Title: {}\n", title));
        }
        out.push_str(&clamp(Some(&page.content), self.options.chunk_chars));
        if self.options.include_links && !page.links.is_empty() {
            out.push_str("\nLinks:\n");
            for link in page.links.iter().take(MAX_LINKS_PER_PAGE) {
                out.push_str(&format!("- {}\n", link));
            }
        }
        out
    }
}

impl SearchRuntime {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: SEARCH_TOOL.to_string(),
            description: format!(
                "Search the web. Returns up to {} results with title, URL and snippet. Supports site: operators.",
                self.max_results
            ),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query"}
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&mut self, arguments: &str) -> AppResult<String> {
        let args: SearchArgs = match serde_json::from_str(arguments) {
            Ok(args) => args,
            Err(e) => return Ok(format!("Invalid arguments for {}: {}", SEARCH_TOOL, e)),
        };

        debug!(engine = self.engine.name(), query = %args.query, "Running web search tool");
        let hits = self.engine.search(&args.query, self.max_results).await?;
        Ok(render_hits(&args.query, &hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeScraper, StaticEngine};
    use crate::scrape::SupportedOptions;

    fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    fn scrape_runtime(options: ScrapeOptions, allowed: &[&str], scraper: Arc<FakeScraper>) -> ToolRuntime {
        let scraper: Arc<dyn PageScraper> = scraper;
        ToolRuntime::bind(
            &ToolBinding::scrape(options, allowed.iter().map(|s| s.to_string()).collect()),
            Some(&scraper),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_refuses_urls_outside_candidate_set() {
        let scraper = Arc::new(FakeScraper::new());
        let mut rt = scrape_runtime(ScrapeOptions::default(), &["https://www.amazon.in/dp/A1"], scraper.clone());

        let out = rt
            .execute(&call(SCRAPE_TOOL, json!({"urls": ["https://evil.example.com/x"]})))
            .await
            .unwrap();

        assert!(out.contains("Refused https://evil.example.com/x"));
        assert!(scraper.scraped().is_empty());
    }

    #[tokio::test]
    async fn test_allowed_url_matches_without_trailing_slash() {
        let scraper = Arc::new(FakeScraper::new());
        let mut rt = scrape_runtime(ScrapeOptions::default(), &["https://www.amazon.in/dp/A1/"], scraper.clone());

        let out = rt
            .execute(&call(SCRAPE_TOOL, json!({"url": "https://www.amazon.in/dp/A1"})))
            .await
            .unwrap();

        assert!(out.contains("--- Page: https://www.amazon.in/dp/A1 ---"));
        assert_eq!(scraper.scraped(), vec!["https://www.amazon.in/dp/A1".to_string()]);
    }

    #[tokio::test]
    async fn test_candidates_mined_from_markdown_accept_clean_urls() {
        let mined = crate::agents::resolver::extract_urls(
            "1. **https://www.amazon.in/dp/B01**\n2. `https://www.flipkart.com/p/2`",
            5,
        );
        let allowed: Vec<&str> = mined.iter().map(String::as_str).collect();
        let scraper = Arc::new(FakeScraper::new());
        let mut rt = scrape_runtime(ScrapeOptions::default().with_max_pages(2), &allowed, scraper.clone());

        let out = rt
            .execute(&call(
                SCRAPE_TOOL,
                json!({"urls": ["https://www.amazon.in/dp/B01", "https://www.flipkart.com/p/2"]}),
            ))
            .await
            .unwrap();

        assert!(!out.contains("Refused"));
        assert_eq!(scraper.scraped().len(), 2);
    }

    #[tokio::test]
    async fn test_allow_list_entry_with_markup_still_matches() {
        let scraper = Arc::new(FakeScraper::new());
        let mut rt = scrape_runtime(ScrapeOptions::default(), &["`https://www.amazon.in/dp/A1`"], scraper.clone());

        let out = rt
            .execute(&call(SCRAPE_TOOL, json!({"urls": ["https://www.amazon.in/dp/A1"]})))
            .await
            .unwrap();
        assert!(!out.contains("Refused"));
        assert_eq!(scraper.scraped().len(), 1);
    }

    #[tokio::test]
    async fn test_page_budget_across_calls() {
        let scraper = Arc::new(FakeScraper::new());
        let options = ScrapeOptions::default().with_max_results(2).with_max_pages(1);
        let mut rt = scrape_runtime(options, &[], scraper.clone());

        let first = rt
            .execute(&call(SCRAPE_TOOL, json!({"urls": ["https://a.in/1", "https://a.in/2"]})))
            .await
            .unwrap();
        assert!(first.contains("Skipped https://a.in/2"));

        rt.execute(&call(SCRAPE_TOOL, json!({"urls": ["https://a.in/2"]}))).await.unwrap();
        let third = rt
            .execute(&call(SCRAPE_TOOL, json!({"urls": ["https://a.in/3"]})))
            .await
            .unwrap();

        assert!(third.contains("Page budget of 2 exhausted"));
        assert_eq!(scraper.scraped().len(), 2);
    }

    #[tokio::test]
    async fn test_page_text_is_clipped_to_chunk_size() {
        let scraper = Arc::new(FakeScraper::with_content("y".repeat(5000)));
        let options = ScrapeOptions::default().with_chunk_chars(100);
        let mut rt = scrape_runtime(options, &[], scraper);

        let out = rt
            .execute(&call(SCRAPE_TOOL, json!({"urls": ["https://a.in/1"]})))
            .await
            .unwrap();
        assert!(out.contains(crate::utils::TRUNCATION_MARKER));
        assert!(!out.contains(&"y".repeat(101)));
    }

    #[tokio::test]
    async fn test_unsupported_options_fall_back_to_minimal() {
        let scraper = Arc::new(FakeScraper::new().supporting(SupportedOptions::none()));
        let rt = scrape_runtime(ScrapeOptions::default().with_max_results(8), &[], scraper);
        match rt {
            ToolRuntime::Scrape(rt) => assert_eq!(*rt.options(), ScrapeOptions::minimal()),
            ToolRuntime::Search(_) => panic!("expected scrape runtime"),
        }
    }

    #[tokio::test]
    async fn test_scraper_failure_propagates() {
        let scraper = Arc::new(FakeScraper::failing());
        let mut rt = scrape_runtime(ScrapeOptions::default(), &[], scraper);
        let err = rt
            .execute(&call(SCRAPE_TOOL, json!({"urls": ["https://a.in/1"]})))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Scrape(_)));
    }

    #[tokio::test]
    async fn test_bad_arguments_and_unknown_tool_are_reported() {
        let scraper = Arc::new(FakeScraper::new());
        let mut rt = scrape_runtime(ScrapeOptions::default(), &[], scraper);

        let bad = ToolCall {
            id: "c".to_string(),
            name: SCRAPE_TOOL.to_string(),
            arguments: "not json".to_string(),
        };
        assert!(rt.execute(&bad).await.unwrap().starts_with("Invalid arguments"));
        assert!(rt
            .execute(&call("delete_everything", json!({})))
            .await
            .unwrap()
            .starts_with("Unknown tool"));
    }

    #[tokio::test]
    async fn test_search_tool() {
        let engine: Arc<dyn SearchEngine> = Arc::new(StaticEngine::new(vec![
            ("Boat Rockerz", "https://www.amazon.in/dp/B1"),
            ("Sony WH", "https://www.flipkart.com/sony"),
        ]));
        let mut rt = ToolRuntime::bind(&ToolBinding::WebSearch { max_results: 1 }, None, Some(&engine)).unwrap();

        assert_eq!(rt.definition().name, SEARCH_TOOL);
        let out = rt.execute(&call(SEARCH_TOOL, json!({"query": "headphones"}))).await.unwrap();
        assert!(out.contains("https://www.amazon.in/dp/B1"));
        assert!(!out.contains("flipkart"));
    }

    #[test]
    fn test_bind_without_backend_fails() {
        let binding = ToolBinding::scrape(ScrapeOptions::default(), vec![]);
        assert!(ToolRuntime::bind(&binding, None, None).is_err());
    }
}
