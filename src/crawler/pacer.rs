//! Request pacing
//!
//! Enforces a minimum wall-clock gap between consecutive requests. There is only
//! one request in flight at a time, so a single timestamp is enough.

use std::time::{Duration, Instant};

/// Tracks when the last request was issued
#[derive(Debug, Clone, Default)]
pub struct Pacer {
    last_request_time: Option<Instant>,
}

impl Pacer {
    /// Creates a pacer with no request recorded yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a request is being issued now
    pub fn record_request(&mut self) {
        self.last_request_time = Some(Instant::now());
    }

    /// Calculates the time until the next request may be issued
    ///
    /// Returns None if a request can be made now.
    pub fn time_until_next_request(&self, delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed >= delay {
            None
        } else {
            Some(delay - elapsed)
        }
    }

    /// Sleeps until `delay` has passed since the last recorded request
    pub async fn wait(&self, delay: Duration) {
        if let Some(wait) = self.time_until_next_request(delay, Instant::now()) {
            tracing::trace!("Waiting {:?} before next request", wait);
            tokio::time::sleep(wait).await;
        }
    }
}
