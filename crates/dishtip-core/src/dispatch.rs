/// Bounded fan-out of prompts to the inference collaborator.
///
/// Every prompt runs on its own tokio task, gated by a semaphore so no more than
/// `max_in_flight` collaborator calls are outstanding at once. Outcomes land in the slot
/// matching the prompt's input position. A failed prompt yields an `Err` in its slot and
/// never cancels the others.
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::cache::InferenceCache;
use crate::error::{InferenceError, PipelineError};
use crate::inference::InferenceClient;

pub const DEFAULT_MAX_IN_FLIGHT: usize = 10;

pub type ChunkOutcome = Result<String, InferenceError>;

#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn InferenceClient>,
    cache: Arc<InferenceCache>,
    permits: Arc<Semaphore>,
    max_in_flight: usize,
}

impl Dispatcher {
    /// The semaphore belongs to the dispatcher, so the cap holds across concurrent
    /// pipeline runs sharing it.
    pub fn new(
        client: Arc<dyn InferenceClient>,
        cache: Arc<InferenceCache>,
        max_in_flight: NonZeroUsize,
    ) -> Self {
        Self {
            client,
            cache,
            permits: Arc::new(Semaphore::new(max_in_flight.get())),
            max_in_flight: max_in_flight.get(),
        }
    }

    pub fn cache(&self) -> &InferenceCache {
        &self.cache
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Run every prompt and return one outcome per prompt, in input order.
    ///
    /// Fails only if a worker task panics.
    pub async fn dispatch(&self, prompts: Vec<String>) -> Result<Vec<ChunkOutcome>, PipelineError> {
        let mut slots: Vec<Option<ChunkOutcome>> = (0..prompts.len()).map(|_| None).collect();
        let mut workers = JoinSet::new();

        for (idx, prompt) in prompts.into_iter().enumerate() {
            let client = Arc::clone(&self.client);
            let cache = Arc::clone(&self.cache);
            let permits = Arc::clone(&self.permits);
            workers.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return (idx, Err(InferenceError::Backend("dispatcher closed".to_string())));
                };
                let outcome = cache
                    .get_or_compute(&prompt, || client.complete(&prompt))
                    .await;
                (idx, outcome)
            });
        }

        while let Some(joined) = workers.join_next().await {
            let (idx, outcome) = joined?;
            if let Err(e) = &outcome {
                warn!(chunk = idx, error = %e, "dish extraction failed for chunk, treating as no dishes");
            }
            slots[idx] = Some(outcome);
        }

        Ok(slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(InferenceError::Backend("worker produced no outcome".to_string()))
                })
            })
            .collect())
    }
}
