use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

/// Token bucket that paces outbound inference requests.
///
/// Unlike a gate that rejects, `acquire` waits until a token is available, so callers
/// under the dispatcher's concurrency cap are slowed down rather than failed.
#[derive(Clone)]
pub struct RateLimiter {
    rps: u32,
    state: Arc<Mutex<Bucket>>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last: Instant,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Option<Self> {
        if rps == 0 {
            return None;
        }
        Some(Self {
            rps,
            state: Arc::new(Mutex::new(Bucket {
                tokens: rps as f64,
                last: Instant::now(),
            })),
        })
    }

    /// `RATE_LIMIT_RPS`; unset, zero or malformed disables limiting.
    pub fn from_env() -> Option<Self> {
        let rps = std::env::var("RATE_LIMIT_RPS")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())?;
        Self::new(rps)
    }

    pub fn rps(&self) -> u32 {
        self.rps
    }

    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.state.lock().await;
                self.refill(&mut bucket);
                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }
                Duration::from_secs_f64((1.0 - bucket.tokens) / self.rps as f64)
            };
            debug!(wait_ms = wait.as_millis(), rps = self.rps, "rate limited, waiting");
            tokio::time::sleep(wait).await;
        }
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last);
        bucket.last = now;
        let cap = self.rps as f64;
        bucket.tokens = (bucket.tokens + elapsed.as_secs_f64() * cap).min(cap);
    }
}
