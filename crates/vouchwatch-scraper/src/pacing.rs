//! Fixed delay between code reveals.
//!
//! Each reveal opens a new tab on the vendor's server; the delay keeps the
//! session from hammering it. It is applied unconditionally, there is no
//! adaptive backoff.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    delay: Duration,
}

impl Pacing {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the configured delay.
    pub async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::debug!(delay_ms = self.delay.as_millis(), "pacing before next reveal");
        tokio::time::sleep(self.delay).await;
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
