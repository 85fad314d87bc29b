/// Error types for the extraction-and-ranking pipeline.
///
/// Inference failures are recovered per chunk by the dispatcher and never reach the
/// caller. `PipelineError` is reserved for failures the dispatcher cannot absorb.
use crate::openai::OpenAiClientError;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("inference client error: {0}")]
    Client(#[from] OpenAiClientError),

    #[error("model response carried no completion choice")]
    EmptyCompletion,

    #[error("inference backend error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("dispatch worker failed: {0}")]
    Worker(String),
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::Worker(err.to_string())
    }
}
