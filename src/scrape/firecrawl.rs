// Firecrawl scrape client
// POST {base}/v2/scrape with the page URL; markdown comes back under data.markdown

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{PageScraper, ScrapeOptions, ScrapedPage, SupportedOptions};
use crate::config::ScrapeConfig;
use crate::types::{AppError, AppResult};

pub const FIRECRAWL_API_BASE: &str = "https://api.firecrawl.dev";

pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: Vec<&'static str>,
    only_main_content: bool,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    links: Vec<String>,
    #[serde(default)]
    metadata: Option<ScrapeMetadata>,
}

#[derive(Deserialize)]
struct ScrapeMetadata {
    #[serde(default)]
    title: Option<String>,
}

impl FirecrawlClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `None` when no Firecrawl key is configured
    pub fn from_config(config: &ScrapeConfig) -> AppResult<Option<Self>> {
        if config.firecrawl_api_key.trim().is_empty() {
            return Ok(None);
        }
        Self::new(
            &config.firecrawl_api_key,
            &config.firecrawl_base_url,
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }

    fn formats(options: &ScrapeOptions) -> Vec<&'static str> {
        if options.include_links {
            vec!["markdown", "links"]
        } else {
            vec!["markdown"]
        }
    }
}

#[async_trait]
impl PageScraper for FirecrawlClient {
    fn supported_options(&self) -> SupportedOptions {
        SupportedOptions::all()
    }

    async fn scrape(&self, url: &str, options: &ScrapeOptions) -> AppResult<ScrapedPage> {
        info!(url = %url, readable = options.extract_readable, "Scraping page via Firecrawl");

        let body = ScrapeRequest {
            url,
            formats: Self::formats(options),
            only_main_content: options.extract_readable,
        };

        let response = self
            .client
            .post(format!("{}/v2/scrape", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Scrape(format!("Firecrawl request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Scrape(format!("Firecrawl error ({}): {}", status, error_text)));
        }

        let parsed: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| AppError::Scrape(format!("Failed to parse Firecrawl response: {}", e)))?;

        if !parsed.success {
            return Err(AppError::Scrape(
                parsed.error.unwrap_or_else(|| format!("Firecrawl could not scrape {}", url)),
            ));
        }

        let data = parsed
            .data
            .ok_or_else(|| AppError::Scrape(format!("Firecrawl returned no data for {}", url)))?;

        let content = data.markdown.unwrap_or_default();
        debug!(url = %url, chars = content.chars().count(), links = data.links.len(), "Page scraped");

        Ok(ScrapedPage {
            url: url.to_string(),
            title: data.metadata.and_then(|m| m.title),
            content,
            links: if options.include_links { data.links } else { Vec::new() },
        })
    }
}
