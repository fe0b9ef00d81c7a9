//! Tool-calling generation loop.
//!
//! Sends the instructions as the system message and the composed query as
//! the user message. When a tool is bound it is advertised as a function;
//! requested calls are executed sequentially against the per-generation
//! budget and fed back as tool messages until the model answers in text.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::tools::ToolRuntime;
use super::{Generation, GenerationRequest, Generator};
use crate::config::LLMConfig;
use crate::llm::LLM;
use crate::scrape::PageScraper;
use crate::search::SearchEngine;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest};

/// Tool round trips before the final round is sent without tools
const DEFAULT_MAX_TOOL_ROUNDS: usize = 4;

pub struct LlmGenerator {
    llm: LLM,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_tool_rounds: usize,
    scraper: Option<Arc<dyn PageScraper>>,
    search_engine: Option<Arc<dyn SearchEngine>>,
}

impl LlmGenerator {
    pub fn new(llm: LLM, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: None,
            max_tokens: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            scraper: None,
            search_engine: None,
        }
    }

    pub fn from_config(llm: LLM, config: &LLMConfig) -> Self {
        Self::new(llm, config.model.clone())
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
            .with_max_tool_rounds(config.max_tool_rounds)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds.max(1);
        self
    }

    pub fn with_scraper(mut self, scraper: Arc<dyn PageScraper>) -> Self {
        self.scraper = Some(scraper);
        self
    }

    pub fn with_search_engine(mut self, engine: Arc<dyn SearchEngine>) -> Self {
        self.search_engine = Some(engine);
        self
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Generation> {
        info!(
            agent = %request.agent,
            provider = %self.llm.provider(),
            model = %self.model,
            tool = ?request.tool.as_ref().map(|_| "bound"),
            "Starting generation"
        );

        let mut runtime = request
            .tool
            .as_ref()
            .map(|binding| ToolRuntime::bind(binding, self.scraper.as_ref(), self.search_engine.as_ref()))
            .transpose()?;
        let tool_defs: Vec<_> = runtime.iter().map(|rt| rt.definition()).collect();

        let mut messages = vec![
            LLMMessage::system(request.system_prompt()),
            LLMMessage::user(&request.query),
        ];
        let mut executed = 0;

        for round in 0..self.max_tool_rounds {
            let last_round = round + 1 == self.max_tool_rounds;
            let tools = if last_round || runtime.is_none() {
                Vec::new()
            } else {
                tool_defs.clone()
            };
            if last_round && runtime.is_some() {
                debug!(round, "Final round, tools withheld");
            }

            let response = self
                .llm
                .create_chat_completion(&LLMRequest {
                    model: self.model.clone(),
                    messages: messages.clone(),
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                    tools,
                })
                .await?;

            let rt = match runtime.as_mut() {
                Some(rt) if !last_round && !response.tool_calls.is_empty() => rt,
                _ => {
                    if !response.tool_calls.is_empty() {
                        warn!(
                            agent = %request.agent,
                            count = response.tool_calls.len(),
                            "Ignoring tool calls made without tools on offer"
                        );
                    }
                    info!(
                        agent = %request.agent,
                        round,
                        tool_calls = executed,
                        total_tokens = response.usage.total_tokens,
                        response_len = response.content.len(),
                        "Generation complete"
                    );
                    return Ok(Generation {
                        content: response.content,
                        tool_calls: executed,
                    });
                }
            };

            info!(round, count = response.tool_calls.len(), "Model requested tool calls");
            messages.push(LLMMessage::assistant_tool_calls(response.tool_calls.clone()));

            for call in &response.tool_calls {
                let output = rt.execute(call).await?;
                executed += 1;
                messages.push(LLMMessage::tool_result(&call.id, output));
            }
        }

        Err(AppError::Internal(format!(
            "{} finished {} tool rounds without an answer",
            request.agent, self.max_tool_rounds
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ToolBinding;
    use crate::scrape::ScrapeOptions;
    use crate::testing::{FakeScraper, ScriptedAdapter};
    use crate::types::{LLMProvider, LLMResponse, TokenUsage, ToolCall};

    fn generator(adapter: Arc<ScriptedAdapter>, scraper: Arc<FakeScraper>) -> LlmGenerator {
        LlmGenerator::new(LLM::with_adapter(LLMProvider::Groq, adapter), "openai/gpt-oss-20b")
            .with_max_tool_rounds(3)
            .with_scraper(scraper)
    }

    fn scrape_call(url: &str) -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            name: "scrape_pages".to_string(),
            arguments: serde_json::json!({"urls": [url]}).to_string(),
        }
    }

    #[tokio::test]
    async fn test_plain_generation_without_tool() {
        let adapter = Arc::new(ScriptedAdapter::new().then_text("Key Specs: ..."));
        let gen = generator(adapter.clone(), Arc::new(FakeScraper::new()));

        let request = GenerationRequest::new("Buyer Educator", vec!["Be concise.".to_string()], "Buying a laptop");
        let out = gen.generate(&request).await.unwrap();

        assert_eq!(out.content, "Key Specs: ...");
        assert_eq!(out.tool_calls, 0);
        let seen = adapter.requests();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].tools.is_empty());
        assert_eq!(seen[0].messages[0].content.as_deref(), Some("- Be concise."));
        assert_eq!(seen[0].messages[1].content.as_deref(), Some("Buying a laptop"));
    }

    #[tokio::test]
    async fn test_tool_call_round_trip() {
        let adapter = Arc::new(
            ScriptedAdapter::new()
                .then_tool_calls(vec![scrape_call("https://example.com/p")])
                .then_text("Verdict: Buy"),
        );
        let scraper = Arc::new(FakeScraper::new());
        let gen = generator(adapter.clone(), scraper.clone());

        let request = GenerationRequest::new("Review Sentiment Agent", vec![], "Analyze")
            .with_tool(ToolBinding::scrape(
                ScrapeOptions::default().with_max_results(1),
                vec!["https://example.com/p".to_string()],
            ));
        let out = gen.generate(&request).await.unwrap();

        assert_eq!(out.content, "Verdict: Buy");
        assert_eq!(out.tool_calls, 1);
        assert_eq!(scraper.scraped(), vec!["https://example.com/p".to_string()]);

        let seen = adapter.requests();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].tools.len(), 1);
        let tool_msg = seen[1].messages.last().unwrap();
        assert_eq!(tool_msg.role, "tool");
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn test_final_round_withholds_tools() {
        let adapter = Arc::new(
            ScriptedAdapter::new()
                .then_tool_calls(vec![scrape_call("https://a.in/1")])
                .then_tool_calls(vec![scrape_call("https://a.in/2")])
                .then_text("done"),
        );
        let gen = generator(adapter.clone(), Arc::new(FakeScraper::new()));

        let request = GenerationRequest::new("Trending Product Finder", vec![], "Trending")
            .with_tool(ToolBinding::scrape(ScrapeOptions::default().with_max_results(8), vec![]));
        let out = gen.generate(&request).await.unwrap();

        assert_eq!(out.content, "done");
        let seen = adapter.requests();
        assert_eq!(seen.len(), 3);
        assert!(!seen[1].tools.is_empty());
        assert!(seen[2].tools.is_empty());
    }

    #[tokio::test]
    async fn test_tool_calls_in_final_round_are_not_executed() {
        let adapter = Arc::new(
            ScriptedAdapter::new()
                .then_tool_calls(vec![scrape_call("https://a.in/1")])
                .then_tool_calls(vec![scrape_call("https://a.in/2")])
                .then(LLMResponse {
                    content: "Best pick: a.in/1".to_string(),
                    finish_reason: "tool_calls".to_string(),
                    usage: TokenUsage::default(),
                    tool_calls: vec![scrape_call("https://a.in/3")],
                }),
        );
        let scraper = Arc::new(FakeScraper::new());
        let gen = generator(adapter.clone(), scraper.clone());

        let request = GenerationRequest::new("Product Comparison Agent", vec![], "Compare")
            .with_tool(ToolBinding::scrape(ScrapeOptions::default().with_max_results(8), vec![]));
        let out = gen.generate(&request).await.unwrap();

        assert_eq!(out.content, "Best pick: a.in/1");
        assert_eq!(out.tool_calls, 2);
        assert_eq!(
            scraper.scraped(),
            vec!["https://a.in/1".to_string(), "https://a.in/2".to_string()]
        );
        assert_eq!(adapter.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let adapter = Arc::new(ScriptedAdapter::new().then_error("upstream 503"));
        let gen = generator(adapter, Arc::new(FakeScraper::new()));

        let err = gen
            .generate(&GenerationRequest::new("Product Research Agent", vec![], "q"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("upstream 503"));
    }

    #[tokio::test]
    async fn test_missing_scraper_fails_before_calling_model() {
        let adapter = Arc::new(ScriptedAdapter::new().then_text("unused"));
        let gen = LlmGenerator::new(LLM::with_adapter(LLMProvider::Groq, adapter.clone()), "m");

        let request = GenerationRequest::new("Product Comparison Agent", vec![], "q")
            .with_tool(ToolBinding::scrape(ScrapeOptions::default(), vec![]));
        assert!(gen.generate(&request).await.is_err());
        assert!(adapter.requests().is_empty());
    }
}
