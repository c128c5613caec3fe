// ABOUTME: Rate limiting for placement passes.
// ABOUTME: Runs the first request immediately and folds bursts into one trailing pass.

use std::time::{Duration, Instant};

/// Leading-edge throttle with a single pending trailing run.
///
/// Time is passed in by the caller, which keeps the policy deterministic.
#[derive(Debug, Clone)]
pub struct PassThrottle {
    window: Duration,
    last_run: Option<Instant>,
    pending: bool,
}

impl PassThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_run: None,
            pending: false,
        }
    }

    pub fn from_millis(window_ms: u64) -> Self {
        Self::new(Duration::from_millis(window_ms))
    }

    /// Ask for a pass. Returns true if the caller should run it now; otherwise
    /// the request is remembered and released by [`PassThrottle::poll`].
    pub fn request(&mut self, now: Instant) -> bool {
        if self.window_elapsed(now) {
            self.record(now);
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Returns true once a deferred request is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending && self.window_elapsed(now) {
            self.record(now);
            true
        } else {
            false
        }
    }

    /// Note a pass that ran outside the throttle; clears any pending request.
    pub fn record(&mut self, now: Instant) {
        self.last_run = Some(now);
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// When a pending request becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        match (self.pending, self.last_run) {
            (true, Some(last)) => Some(last + self.window),
            _ => None,
        }
    }

    fn window_elapsed(&self, now: Instant) -> bool {
        match self.last_run {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.window,
        }
    }
}
