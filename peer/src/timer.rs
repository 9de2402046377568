use std::time::{Duration, Instant};

/// Fires once per interval. A timer that was never reset does not ring.
#[derive(Clone, Debug)]
pub struct Timer {
    duration: Duration,
    last: Option<Instant>,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            last: None,
        }
    }

    pub fn reset(&mut self, now: Instant) {
        self.last = Some(now);
    }

    pub fn stop(&mut self) {
        self.last = None;
    }

    pub fn is_running(&self) -> bool {
        self.last.is_some()
    }

    pub fn ringing(&self, now: Instant) -> bool {
        match self.last {
            Some(last) => now.saturating_duration_since(last) >= self.duration,
            None => false,
        }
    }
}
