//! LLM provider abstraction and the brain that drives it.
//!
//! Defines the `LlmProvider` trait for model-agnostic completions, the
//! `Brain` wrapper every pipeline stage talks to, and a scripted
//! `MockLlmProvider` for tests.

use crate::config::RetryConfig;
use crate::error::LlmError;
use crate::providers::with_retry;
use crate::types::{CompletionRequest, CompletionResponse, Message, Role, TokenUsage};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Trait for LLM providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform a full completion and return the response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Return the model name.
    fn model_name(&self) -> &str;
}

/// The Brain wraps an LLM provider with request defaults and usage tracking.
///
/// Cloning is cheap; clones share the provider and the usage counter.
#[derive(Clone)]
pub struct Brain {
    provider: Arc<dyn LlmProvider>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    retry: RetryConfig,
    total_usage: Arc<Mutex<TokenUsage>>,
}

impl Brain {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            temperature: None,
            max_tokens: None,
            retry: RetryConfig::default(),
            total_usage: Arc::new(Mutex::new(TokenUsage::default())),
        }
    }

    /// Sampling temperature. Unset leaves it to the provider's default.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<usize>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Single-turn completion: one system prompt, one user prompt, text back.
    pub async fn complete_text(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        self.complete_messages(vec![
            Message::system(system_prompt),
            Message::user(user_prompt),
        ])
        .await
    }

    /// Multi-turn completion over an explicit message history.
    pub async fn complete_messages(&self, messages: Vec<Message>) -> Result<String, LlmError> {
        let request = CompletionRequest {
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            model: None,
        };
        let response = with_retry(&self.retry, || self.provider.complete(request.clone())).await?;
        self.track_usage(&response.usage);
        debug!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "LLM completion finished"
        );
        Ok(response.message.content)
    }

    /// Token usage accumulated across every clone of this brain.
    pub fn total_usage(&self) -> TokenUsage {
        self.total_usage
            .lock()
            .map(|usage| *usage)
            .unwrap_or_default()
    }

    fn track_usage(&self, usage: &TokenUsage) {
        if let Ok(mut total) = self.total_usage.lock() {
            total.input_tokens += usage.input_tokens;
            total.output_tokens += usage.output_tokens;
        }
    }
}

/// A mock LLM provider for testing and development.
///
/// Returns queued responses in FIFO order and records every request it
/// receives so tests can assert on call counts and prompts.
pub struct MockLlmProvider {
    model: String,
    responses: Mutex<Vec<Result<CompletionResponse, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a MockLlmProvider that always returns the given text.
    ///
    /// Queues multiple copies of the response so it can handle multiple calls.
    pub fn with_response(text: &str) -> Self {
        let provider = Self::new();
        for _ in 0..20 {
            provider.queue_text(text);
        }
        provider
    }

    /// Create a MockLlmProvider answering with each text in order.
    pub fn with_responses<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let provider = Self::new();
        for text in texts {
            provider.queue_text(text.as_ref());
        }
        provider
    }

    /// Queue a text response to be returned by the next `complete` call.
    pub fn queue_text(&self, text: &str) {
        self.queue_response(Ok(Self::text_response(text)));
    }

    /// Queue an error to be returned by the next `complete` call.
    pub fn queue_error(&self, error: LlmError) {
        self.queue_response(Err(error));
    }

    pub fn queue_response(&self, response: Result<CompletionResponse, LlmError>) {
        self.responses.lock().unwrap().push(response);
    }

    /// Create a simple text response for testing.
    pub fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::new(Role::Assistant, text),
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
            model: "mock-model".to_string(),
            finish_reason: Some("stop".to_string()),
        }
    }

    /// Number of completion calls received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose system prompt contains `needle`.
    pub fn calls_with_system_prompt(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.system_prompt().is_some_and(|s| s.contains(needle)))
            .count()
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(MockLlmProvider::text_response(
                "I'm a mock LLM. No queued responses available.",
            ))
        } else {
            responses.remove(0)
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
