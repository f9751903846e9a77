use rand::random_range;
use tokio::time::{Duration, sleep};

use crate::config::DelayConfig;

/// Pause taken between two requests.
///
/// Injected into the collector so tests can run the loop without
/// waiting on real timers.
#[async_trait::async_trait]
pub trait DelayStrategy: Send + Sync {
    async fn pause(&self);
}

/// Uniformly random delay in `[min_ms, max_ms)`, drawn fresh per call.
///
/// Avoids a fixed-interval polling signature against the remote and
/// gives basic self-throttling.
#[derive(Debug, Clone, Copy)]
pub struct RandomDelay {
    min_ms: u64,
    max_ms: u64,
}

impl RandomDelay {
    pub fn new(cfg: DelayConfig) -> Self {
        Self {
            min_ms: cfg.min_ms,
            max_ms: cfg.max_ms.max(cfg.min_ms + 1),
        }
    }

    pub fn draw_ms(&self) -> u64 {
        random_range(self.min_ms..self.max_ms)
    }
}

#[async_trait::async_trait]
impl DelayStrategy for RandomDelay {
    async fn pause(&self) {
        let ms = self.draw_ms();
        log::debug!("waiting {} ms before next request", ms);
        sleep(Duration::from_millis(ms)).await;
    }
}

/// Zero-duration delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait::async_trait]
impl DelayStrategy for NoDelay {
    async fn pause(&self) {}
}
