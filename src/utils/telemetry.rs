// file: src/utils/telemetry.rs
// description: operation timing for batches and items
// reference: tracing-based timing logs

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Logs the start and end of a named operation.
pub struct OperationTimer {
    operation: String,
    start: Instant,
    quiet: bool,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
            quiet: false,
        }
    }

    /// Same as [`OperationTimer::new`] but logs at debug level. Used for
    /// per-item timing inside a batch.
    pub fn quiet(operation: &str) -> Self {
        debug!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
            quiet: true,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        if self.quiet {
            debug!(
                "Completed operation: {} in {:.2}s",
                self.operation,
                elapsed.as_secs_f64()
            );
        } else {
            info!(
                "Completed operation: {} in {:.2}s",
                self.operation,
                elapsed.as_secs_f64()
            );
        }
        elapsed
    }

    pub fn finish_with_count(self, count: usize) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} - {} items in {:.2}s ({:.2} items/sec)",
            self.operation,
            count,
            elapsed.as_secs_f64(),
            per_second(count, elapsed)
        );
        elapsed
    }

    pub fn warn_if_slow(&self, threshold: Duration, message: &str) {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                "Slow operation [{}]: {} took {:.2}s (expected {:.2}s)",
                self.operation,
                message,
                elapsed.as_secs_f64(),
                threshold.as_secs_f64()
            );
        }
    }
}

pub fn per_second(count: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { count as f64 / secs } else { 0.0 }
}
