use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug)]
pub struct OpenAiClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub default_timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_error_body_bytes: usize,
}

impl Default for OpenAiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            default_timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_millis(5_000),
            max_error_body_bytes: 8 * 1024,
        }
    }
}

impl OpenAiClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url);
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let default_timeout = env_parse::<u64>("OPENAI_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.default_timeout);
        let max_retries = env_parse::<u32>("OPENAI_MAX_RETRIES").unwrap_or(defaults.max_retries);
        let initial_backoff = env_parse::<u64>("OPENAI_RETRY_INITIAL_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.initial_backoff);
        let max_backoff = env_parse::<u64>("OPENAI_RETRY_MAX_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.max_backoff);
        let max_error_body_bytes = env_parse::<usize>("OPENAI_MAX_ERROR_BODY_BYTES")
            .unwrap_or(defaults.max_error_body_bytes);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            default_timeout,
            max_retries,
            initial_backoff,
            max_backoff,
            max_error_body_bytes,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAiClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} message={message}")]
    Upstream { status: StatusCode, message: String },

    #[error("upstream returned non-JSON error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },
}

/// Minimal client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    config: OpenAiClientConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, OpenAiClientError> {
        let http = reqwest::Client::builder()
            .user_agent("dishtip/dish-extractor")
            .build()?;
        Ok(Self { config, http })
    }

    pub async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiClientError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        self.with_retry(|| async {
            let mut builder = self
                .http
                .post(&url)
                .timeout(self.config.default_timeout)
                .json(request);
            if let Some(key) = &self.config.api_key {
                builder = builder.bearer_auth(key);
            }
            let resp = builder.send().await?;
            if !resp.status().is_success() {
                return Err(upstream_error(resp, self.config.max_error_body_bytes).await);
            }
            let body = resp.bytes().await?;
            Ok(serde_json::from_slice::<ChatCompletionResponse>(&body)?)
        })
        .await
    }

    async fn with_retry<T, Fut, F>(&self, mut attempt_fn: F) -> Result<T, OpenAiClientError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, OpenAiClientError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match attempt_fn().await {
                Ok(v) => return Ok(v),
                Err(e) if attempt < self.config.max_retries && is_retryable(&e) => {
                    let delay =
                        backoff_delay(self.config.initial_backoff, self.config.max_backoff, attempt);
                    attempt += 1;
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "chat completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn is_retryable(err: &OpenAiClientError) -> bool {
    match err {
        OpenAiClientError::Request(e) => e.is_timeout() || e.is_connect() || e.is_body(),
        OpenAiClientError::Upstream { status, .. }
        | OpenAiClientError::UpstreamBody { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        }
        OpenAiClientError::InvalidJson(_) => false,
    }
}

/// Exponential backoff capped at `max`, plus up to a quarter of jitter.
fn backoff_delay(initial: Duration, max: Duration, exponent: u32) -> Duration {
    let factor = 1u128.checked_shl(exponent).unwrap_or(u128::MAX);
    let capped_ms = initial
        .as_millis()
        .saturating_mul(factor)
        .min(max.as_millis()) as u64;
    let jitter_ms = clock_jitter_ms((capped_ms / 4).max(1));
    Duration::from_millis(capped_ms.saturating_add(jitter_ms))
}

fn clock_jitter_ms(max_inclusive: u64) -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    nanos % (max_inclusive + 1)
}

async fn upstream_error(resp: reqwest::Response, max_bytes: usize) -> OpenAiClientError {
    let status = resp.status();
    let body = match resp.bytes().await {
        Ok(bytes) => {
            let end = bytes.len().min(max_bytes);
            String::from_utf8_lossy(&bytes[..end]).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<unreadable error body>".to_string()
        }
    };
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => OpenAiClientError::Upstream {
            status,
            message: envelope
                .error
                .message
                .unwrap_or_else(|| "unknown upstream error".to_string()),
        },
        Err(_) => OpenAiClientError::UpstreamBody { status, body },
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if the upstream produced one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}
