//! Minimum-interval throttle around any [`LlmProvider`].
//!
//! Consecutive provider calls start at least `min_interval` apart. Waiters
//! queue on an async mutex, so the spacing holds across concurrent requests.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use parley_core::llm::provider::LlmProvider;
use parley_types::llm::{Completion, GenerationRequest, LlmError};

pub struct RateLimitedProvider<P: LlmProvider> {
    inner: P,
    min_interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl<P: LlmProvider> RateLimitedProvider<P> {
    pub fn new(inner: P, min_interval: Duration) -> Self {
        Self {
            inner,
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    /// Wait until the next call may start, then record its start.
    async fn acquire_slot(&self) {
        let mut last_start = self.last_start.lock().await;
        if let Some(last) = *last_start {
            let ready_at = last + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                tracing::debug!(
                    wait_ms = (ready_at - now).as_millis() as u64,
                    "Throttling provider request"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last_start = Some(Instant::now());
    }
}

impl<P: LlmProvider> LlmProvider for RateLimitedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Completion, LlmError> {
        if !self.min_interval.is_zero() {
            self.acquire_slot().await;
        }
        self.inner.generate(request).await
    }
}
