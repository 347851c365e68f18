// file: src/stream/completion.rs
// description: terminal-event tally that decides when every item has finished
// reference: completion derived from observed events rather than task state

use crate::models::ProgressEvent;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct CompletionTracker {
    total: usize,
    finished: HashSet<String>,
}

impl CompletionTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            finished: HashSet::with_capacity(total),
        }
    }

    /// Returns true when the event is the first terminal event seen for its
    /// item.
    pub fn record(&mut self, event: &ProgressEvent) -> bool {
        event.is_terminal() && self.finished.insert(event.item_id.clone())
    }

    pub fn finished(&self) -> usize {
        self.finished.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.finished.len() >= self.total
    }
}
