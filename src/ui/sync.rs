//! Fixed-interval timer driving position/time polling.
//!
//! The loop does not own a thread. The event loop asks for the next
//! deadline, sleeps until then, and calls `due` to find out whether a
//! tick should run. A tick always finishes before the next deadline is
//! armed, so ticks never overlap.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SyncLoop {
    interval: Duration,
    deadline: Option<Instant>,
}

impl SyncLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arm the timer; restarting pushes the next tick a full interval out
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True once per elapsed interval; re-arms from `now`
    pub fn due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}
