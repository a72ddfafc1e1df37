//! Scrolling log pane fed by the logger observer.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Lines kept before the oldest are dropped
pub const MAX_LINES: usize = 500;

/// Bounded line buffer, cheap to clone and share with the logger
#[derive(Debug, Clone, Default)]
pub struct DebugConsole {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl DebugConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: &str) {
        let mut lines = self.lines.lock();
        for part in line.lines() {
            if lines.len() == MAX_LINES {
                lines.pop_front();
            }
            lines.push_back(part.to_string());
        }
    }

    /// Up to `count` most recent lines, oldest first
    pub fn tail(&self, count: usize) -> Vec<String> {
        let lines = self.lines.lock();
        let skip = lines.len().saturating_sub(count);
        lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}
