use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::Mutex;
use tracing::debug;

/// Spaces out requests by a random delay drawn from `[min, max]`,
/// measured from the previous request.
pub struct RateLimiter {
    min: Duration,
    max: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
            last_request: Mutex::new(None),
        }
    }

    pub fn from_secs(min_secs: f64, max_secs: f64) -> Self {
        Self::new(
            Duration::from_secs_f64(min_secs.max(0.0)),
            Duration::from_secs_f64(max_secs.max(0.0)),
        )
    }

    /// Wait until the next request may go out. Concurrent callers queue up.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        let delay = self.sample_delay();

        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < delay {
                let sleep_for = delay - elapsed;
                debug!(secs = sleep_for.as_secs_f64(), "rate limiting");
                tokio::time::sleep(sleep_for).await;
            }
        }

        *last = Some(Instant::now());
    }

    fn sample_delay(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::rng().random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}
