use dishtip_core::config::ZeroLimit;
use dishtip_core::error::PipelineError;
use dishtip_core::openai::OpenAiClientError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("inference client setup failed: {0}")]
    Client(#[from] OpenAiClientError),
}

impl From<ZeroLimit> for AppError {
    fn from(err: ZeroLimit) -> Self {
        AppError::Config(err.to_string())
    }
}
