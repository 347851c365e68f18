// file: src/pipeline/reporter.rs
// description: progress sink port and the per-item reporter that keeps events monotonic
// reference: fire-and-forget progress callbacks

use crate::models::{BatchItem, ItemStatus, ProgressEvent};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Receives progress events. Implementations must not block.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Emits the events of one item. Status never moves backwards, progress
/// never decreases, and at most one terminal event is sent.
pub struct ItemReporter<'a> {
    sink: &'a dyn ProgressSink,
    item_id: String,
    filename: String,
    status: ItemStatus,
    progress: f64,
    last_emit: Option<Instant>,
    finished: bool,
}

impl<'a> ItemReporter<'a> {
    pub fn new(sink: &'a dyn ProgressSink, item: &BatchItem) -> Self {
        Self {
            sink,
            item_id: item.item_id.clone(),
            filename: item.display_name.clone(),
            status: ItemStatus::Queued,
            progress: 0.0,
            last_emit: None,
            finished: false,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn emit(&mut self, status: ItemStatus, progress: f64, message: impl Into<String>) {
        if self.finished {
            return;
        }

        let status = status.max(self.status);
        if status.is_terminal() {
            self.finished = true;
        }

        self.status = status;
        self.progress = progress.clamp(0.0, 100.0).max(self.progress);
        self.last_emit = Some(Instant::now());

        self.sink.emit(ProgressEvent::new(
            self.item_id.clone(),
            self.filename.clone(),
            self.status,
            self.progress,
            message,
        ));
    }

    /// Terminal statuses always report 100 so consumers can close the item.
    pub fn finish(&mut self, status: ItemStatus, message: impl Into<String>) {
        debug_assert!(status.is_terminal());
        self.emit(status, 100.0, message);
    }

    /// Throttle for estimated progress: emit when `min_interval` has passed
    /// since the last event or the value moved by at least `min_delta`.
    pub fn should_emit(&self, value: f64, min_interval: Duration, min_delta: f64) -> bool {
        let interval_due = self
            .last_emit
            .is_none_or(|last| last.elapsed() >= min_interval);
        let delta_due = value - self.progress >= min_delta;

        if !(interval_due || delta_due) {
            debug!(
                "Throttled progress {:.2} for {} (last {:.2})",
                value, self.filename, self.progress
            );
        }
        interval_due || delta_due
    }
}
