use dishtip_core::config::PipelineConfig;
use dishtip_core::inference::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use dishtip_core::openai::OpenAiClientConfig;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub openai: OpenAiClientConfig,
    pub model: String,
    pub max_tokens: u32,
    pub http_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `DISHTIP_MODEL` (default: "gpt-5-nano"; must not be blank)
    /// - `DISHTIP_MAX_TOKENS` (default: 100)
    /// - `DISHTIP_HTTP_LISTEN_ADDR` (serve HTTP instead of MCP over stdio)
    /// - pipeline limits, see [`PipelineConfig::from_env`]
    /// - `OPENAI_*`, see [`OpenAiClientConfig::from_env`]
    pub fn from_env() -> Result<Self, AppError> {
        let pipeline = PipelineConfig::from_env()?;

        let model = std::env::var("DISHTIP_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string())
            .trim()
            .to_string();
        if model.is_empty() {
            return Err(AppError::Config(
                "DISHTIP_MODEL must not be empty".to_string(),
            ));
        }

        let max_tokens = std::env::var("DISHTIP_MAX_TOKENS")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let http_listen_addr = std::env::var("DISHTIP_HTTP_LISTEN_ADDR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            pipeline,
            openai: OpenAiClientConfig::from_env(),
            model,
            max_tokens,
            http_listen_addr,
        })
    }
}
