//! Page scraping
//!
//! The extraction tool the model uses to read candidate pages. Only the
//! trait is used by the orchestration; [`FirecrawlClient`] is the hosted
//! binding.

pub mod firecrawl;
pub mod options;

pub use firecrawl::FirecrawlClient;
pub use options::{ScrapeOptions, SupportedOptions};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::AppResult;

/// Readable content of one page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub links: Vec<String>,
}

#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Options this binding honours
    fn supported_options(&self) -> SupportedOptions;

    async fn scrape(&self, url: &str, options: &ScrapeOptions) -> AppResult<ScrapedPage>;
}
