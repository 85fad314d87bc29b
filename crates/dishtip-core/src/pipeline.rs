use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::cache::InferenceCache;
use crate::chunker::chunk_text;
use crate::config::PipelineConfig;
use crate::dispatch::Dispatcher;
use crate::error::PipelineError;
use crate::inference::InferenceClient;
use crate::merge::merge;
use crate::model::{Recommendation, Review};
use crate::prompt::build_prompt;
use crate::ranking::rank;
use crate::recommend::assemble;

/// Reviews in, ranked dish recommendations out.
///
/// Stages always run in the same order: chunk, prompt, dispatch, merge, rank, assemble.
/// Only dispatch is concurrent; the reviews are owned by `run` and touched again only
/// after every dispatch outcome has been collected.
#[derive(Clone)]
pub struct Pipeline {
    dispatcher: Dispatcher,
    max_words: usize,
}

impl Pipeline {
    pub fn new(dispatcher: Dispatcher, max_words: usize) -> Self {
        Self {
            dispatcher,
            max_words,
        }
    }

    /// Build a pipeline with a fresh process-lifetime cache around `client`.
    pub fn from_config(client: Arc<dyn InferenceClient>, config: &PipelineConfig) -> Self {
        let cache = Arc::new(InferenceCache::new(config.cache_capacity));
        let dispatcher = Dispatcher::new(client, cache, config.max_in_flight);
        Self::new(dispatcher, config.max_words)
    }

    pub async fn run(&self, reviews: Vec<Review>) -> Result<Vec<Recommendation>, PipelineError> {
        if reviews.is_empty() {
            warn!("no reviews passed to pipeline");
            return Ok(Vec::new());
        }
        let started = Instant::now();

        let mut prompts = Vec::new();
        let mut owners = Vec::new();
        for (i, review) in reviews.iter().enumerate() {
            for chunk in chunk_text(&review.text, self.max_words) {
                prompts.push(build_prompt(&chunk));
                owners.push(i);
            }
        }
        info!(
            reviews = reviews.len(),
            chunks = prompts.len(),
            max_in_flight = self.dispatcher.max_in_flight(),
            "starting dish extraction"
        );

        let outputs = self.dispatcher.dispatch(prompts).await?;
        let failed = outputs.iter().filter(|o| o.is_err()).count();

        let mut reviews = merge(reviews, &owners, &outputs);
        rank(&mut reviews);
        let recommendations = assemble(&reviews);

        let stats = self.dispatcher.cache().stats();
        info!(
            recommendations = recommendations.len(),
            failed_chunks = failed,
            cache_hits = stats.hits,
            cache_misses = stats.misses,
            elapsed_ms = started.elapsed().as_millis(),
            "dish recommendations ready"
        );
        Ok(recommendations)
    }
}
