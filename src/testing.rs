//! Test doubles for the external collaborators

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::generation::{Generation, GenerationRequest, Generator};
use crate::llm::LLMAdapter;
use crate::scrape::{PageScraper, ScrapeOptions, ScrapedPage, SupportedOptions};
use crate::search::{SearchEngine, SearchError, SearchHit, WebSearch};
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, TokenUsage, ToolCall};

/// Records every generation request and answers with fixed text
pub struct RecordingGenerator {
    reply: String,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl RecordingGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> GenerationRequest {
        self.requests().pop().expect("no generation recorded")
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Generation> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(Generation {
            content: self.reply.clone(),
            tool_calls: 0,
        })
    }
}

/// Always fails like a timed-out model call
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> AppResult<Generation> {
        Err(AppError::LLMApi("request timed out".to_string()))
    }
}

/// Returns canned free text and records each instruction
pub struct StaticSearch {
    response: Option<String>,
    instructions: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            instructions: Mutex::new(Vec::new()),
        }
    }

    /// A search collaborator whose every call fails
    pub fn failing() -> Self {
        Self {
            response: None,
            instructions: Mutex::new(Vec::new()),
        }
    }

    pub fn instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for StaticSearch {
    async fn search(&self, instruction: &str) -> AppResult<String> {
        self.instructions.lock().unwrap().push(instruction.to_string());
        self.response
            .clone()
            .ok_or_else(|| SearchError::RequestFailed("connection reset".to_string()).into())
    }
}

/// Search engine with fixed hits
pub struct StaticEngine {
    hits: Vec<SearchHit>,
}

impl StaticEngine {
    pub fn new(hits: Vec<(&str, &str)>) -> Self {
        Self {
            hits: hits
                .into_iter()
                .map(|(title, url)| SearchHit {
                    title: title.to_string(),
                    url: url.to_string(),
                    snippet: String::new(),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl SearchEngine for StaticEngine {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

/// In-memory scraper that records requested URLs
pub struct FakeScraper {
    content: String,
    supported: SupportedOptions,
    fail: bool,
    scraped: Mutex<Vec<String>>,
}

impl FakeScraper {
    pub fn new() -> Self {
        Self::with_content("Rated 4.2 out of 5. Battery life is great.")
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            supported: SupportedOptions::all(),
            fail: false,
            scraped: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn supporting(mut self, supported: SupportedOptions) -> Self {
        self.supported = supported;
        self
    }

    pub fn scraped(&self) -> Vec<String> {
        self.scraped.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageScraper for FakeScraper {
    fn supported_options(&self) -> SupportedOptions {
        self.supported
    }

    async fn scrape(&self, url: &str, _options: &ScrapeOptions) -> AppResult<ScrapedPage> {
        if self.fail {
            return Err(AppError::Scrape(format!("Firecrawl error (500) for {}", url)));
        }
        self.scraped.lock().unwrap().push(url.to_string());
        Ok(ScrapedPage {
            url: url.to_string(),
            title: None,
            content: self.content.clone(),
            links: Vec::new(),
        })
    }
}

/// LLM adapter that replays scripted responses in order
pub struct ScriptedAdapter {
    script: Mutex<VecDeque<AppResult<LLMResponse>>>,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedAdapter {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn push(self, item: AppResult<LLMResponse>) -> Self {
        self.script.lock().unwrap().push_back(item);
        self
    }

    pub fn then(self, response: LLMResponse) -> Self {
        self.push(Ok(response))
    }

    pub fn then_text(self, content: &str) -> Self {
        self.push(Ok(LLMResponse {
            content: content.to_string(),
            finish_reason: "stop".to_string(),
            usage: TokenUsage::default(),
            tool_calls: Vec::new(),
        }))
    }

    pub fn then_tool_calls(self, tool_calls: Vec<ToolCall>) -> Self {
        self.push(Ok(LLMResponse {
            content: String::new(),
            finish_reason: "tool_calls".to_string(),
            usage: TokenUsage::default(),
            tool_calls,
        }))
    }

    pub fn then_error(self, message: &str) -> Self {
        self.push(Err(AppError::LLMApi(message.to_string())))
    }

    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMAdapter for ScriptedAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::LLMApi("script exhausted".to_string())))
    }
}
