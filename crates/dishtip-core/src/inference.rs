/// The text-generation collaborator the pipeline depends on.
///
/// The pipeline only needs "submit prompt, receive text, may fail". Implementations are
/// injected into the dispatcher as `Arc<dyn InferenceClient>`.
use async_trait::async_trait;
use tracing::debug;

use crate::error::InferenceError;
use crate::openai::{ChatCompletionRequest, Message, OpenAiClient};
use crate::rate_limit::RateLimiter;

pub const DEFAULT_MODEL: &str = "gpt-5-nano";
pub const DEFAULT_MAX_TOKENS: u32 = 100;

#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError>;
}

/// Chat-completions backed extractor. Each prompt is sent as a single user message.
pub struct OpenAiInference {
    client: OpenAiClient,
    model: String,
    max_tokens: u32,
    limiter: Option<RateLimiter>,
}

impl OpenAiInference {
    pub fn new(client: OpenAiClient, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens,
            limiter: None,
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Option<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: None,
            max_tokens: Some(self.max_tokens),
        }
    }
}

#[async_trait]
impl InferenceClient for OpenAiInference {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }

        let started = std::time::Instant::now();
        let response = self.client.chat_completions(&self.request(prompt)).await?;
        let text = response
            .first_content()
            .ok_or(InferenceError::EmptyCompletion)?
            .trim()
            .to_string();

        debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis(),
            output = %text.chars().take(80).collect::<String>(),
            "completion received"
        );
        Ok(text)
    }
}
