use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;

use dishtip_core::config::PipelineConfig;
use dishtip_core::error::InferenceError;
use dishtip_core::inference::InferenceClient;
use dishtip_core::pipeline::Pipeline;

use crate::service::RecommendationService;

/// Answers with every known dish word found in the prompt's text section.
struct KeywordInference;

const MENU: &[&str] = &["carbonara", "tiramisu", "laksa"];

#[async_trait]
impl InferenceClient for KeywordInference {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        let text = prompt.split("Text:").nth(1).unwrap_or_default().to_lowercase();
        let found: Vec<&str> = MENU.iter().copied().filter(|d| text.contains(*d)).collect();
        if found.is_empty() {
            Ok("none".to_string())
        } else {
            Ok(found.join(", "))
        }
    }
}

pub fn service() -> Arc<RecommendationService> {
    let config = PipelineConfig {
        max_words: 500,
        max_in_flight: NonZeroUsize::new(2).unwrap(),
        cache_capacity: NonZeroUsize::new(16).unwrap(),
    };
    let pipeline = Pipeline::from_config(Arc::new(KeywordInference), &config);
    Arc::new(RecommendationService::new(pipeline))
}
