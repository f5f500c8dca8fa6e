//! Trailing debounce for surface resize notifications.
//!
//! A burst of notifications produces exactly one relayout once no new
//! notification has arrived for `delay`. Only the latest size in a burst is
//! kept. Time is passed in explicitly so callers drive it from whatever
//! event loop they own, and tests stay deterministic.

use std::time::{Duration, Instant};

use crate::layout::Surface;

#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<Surface>,
    deadline: Option<Instant>,
    /// Notifications folded into the pending burst.
    coalesced: usize,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            deadline: None,
            coalesced: 0,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a size change and restart the trailing timer.
    pub fn notify(&mut self, surface: Surface, now: Instant) {
        self.pending = Some(surface);
        self.deadline = Some(now + self.delay);
        self.coalesced += 1;
    }

    /// Latest pending size once the timer has elapsed. Fires once per burst.
    pub fn poll(&mut self, now: Instant) -> Option<Surface> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        if self.coalesced > 1 {
            tracing::trace!(coalesced = self.coalesced, "resize burst settled");
        }
        self.take()
    }

    /// Take the pending size immediately and stop the timer.
    pub fn take(&mut self) -> Option<Surface> {
        self.deadline = None;
        self.coalesced = 0;
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        let _ = self.take();
    }

    /// Time left before the pending burst fires.
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
