use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

// Rate limiter state for one upstream
#[derive(Debug)]
struct RateLimiterState {
    last_reset: Instant,
    request_count: usize,
}

/// Fixed one-second window limiter shared by all requests of a client
#[derive(Debug)]
pub struct RateLimiter {
    rate_limit: usize, // requests per second
    state: Mutex<RateLimiterState>,
}

impl RateLimiter {
    pub fn new(rate_limit: usize) -> Self {
        Self {
            rate_limit: rate_limit.max(1),
            state: Mutex::new(RateLimiterState {
                last_reset: Instant::now(),
                request_count: 0,
            }),
        }
    }

    /// Wait until a request slot is available in the current window
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(state.last_reset);
                if elapsed >= Duration::from_secs(1) {
                    state.last_reset = now;
                    state.request_count = 0;
                }

                if state.request_count < self.rate_limit {
                    state.request_count += 1;
                    return;
                }
                Duration::from_secs(1).saturating_sub(now.duration_since(state.last_reset))
            };

            debug!("rate_limited::waiting_ms::{}", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }
}
