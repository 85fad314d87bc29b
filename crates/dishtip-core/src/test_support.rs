use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::InferenceError;
use crate::inference::InferenceClient;

/// Scripted inference collaborator.
///
/// Replies with the output of the first rule whose needle appears in the prompt, `none`
/// otherwise. Prompts containing `FAIL` error out.
#[derive(Default)]
pub struct StubInference {
    rules: Vec<(String, String)>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl StubInference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, needle: &str, output: &str) -> Self {
        self.rules.push((needle.to_string(), output.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl InferenceClient for StubInference {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(prompt.to_string());
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if prompt.contains("FAIL") {
            return Err(InferenceError::Backend("scripted failure".to_string()));
        }
        Ok(self
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| "none".to_string()))
    }
}
