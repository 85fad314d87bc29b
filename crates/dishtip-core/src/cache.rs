/// In-process LRU memo of model output keyed by the exact rendered prompt.
///
/// The lock guards only the map. It is released before the collaborator runs, so two
/// workers missing on the same prompt at the same time may both compute it. Inference is
/// idempotent, so the later insert simply overwrites the earlier one.
///
/// Failed computations are never stored.
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct InferenceCache {
    entries: Mutex<LruCache<String, String>>,
    capacity: NonZeroUsize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InferenceCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a prompt, marking it most recently used on a hit.
    pub async fn get(&self, prompt: &str) -> Option<String> {
        self.entries.lock().await.get(prompt).cloned()
    }

    /// Store a value, evicting the least recently used entry when full.
    pub async fn insert(&self, prompt: &str, value: String) {
        let evicted = self.entries.lock().await.push(prompt.to_string(), value);
        if let Some((key, _)) = evicted.filter(|(key, _)| key != prompt) {
            debug!(evicted_len = key.len(), "inference cache evicted entry");
        }
    }

    /// Return the memoized output for `prompt`, or run `compute` and memoize its success.
    pub async fn get_or_compute<F, Fut, E>(&self, prompt: &str, compute: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(hit) = self.get(prompt).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let value = compute().await?;
        self.insert(prompt, value.clone()).await;
        Ok(value)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn cache(capacity: usize) -> InferenceCache {
        InferenceCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[tokio::test]
    async fn repeated_prompt_computes_once() {
        let cache = cache(8);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let out: Result<String, String> = cache
                .get_or_compute("prompt", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("pizza, pasta".to_string())
                })
                .await;
            assert_eq!(out.unwrap(), "pizza, pasta");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 1 });
    }

    #[tokio::test]
    async fn failures_are_not_memoized() {
        let cache = cache(8);
        let calls = AtomicUsize::new(0);

        let first: Result<String, String> = cache
            .get_or_compute("prompt", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("upstream down".to_string())
            })
            .await;
        assert!(first.is_err());
        assert!(cache.is_empty().await);

        let second: Result<String, String> = cache
            .get_or_compute("prompt", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("ramen".to_string())
            })
            .await;
        assert_eq!(second.unwrap(), "ramen");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn evicts_least_recently_used() {
        let cache = cache(2);
        cache.insert("a", "1".to_string()).await;
        cache.insert("b", "2".to_string()).await;

        // Touch "a" so "b" becomes the eviction candidate.
        assert_eq!(cache.get("a").await.as_deref(), Some("1"));
        cache.insert("c", "3".to_string()).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("b").await, None);
        assert_eq!(cache.get("a").await.as_deref(), Some("1"));
        assert_eq!(cache.get("c").await.as_deref(), Some("3"));
        assert_eq!(cache.capacity(), 2);
    }
}
