// file: src/pipeline/progress.rs
// description: terminal progress bars and batch statistics
// reference: uses indicatif for progress bars and tracks screening metrics

use crate::models::{BatchResult, ItemStatus, ProgressEvent};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    pub documents: usize,
    pub completed: usize,
    pub failed: usize,
    pub best_match: Option<f64>,
    pub mean_match: f64,
    pub duration_secs: f64,
}

impl BatchStats {
    /// Match figures only count completed documents.
    pub fn from_batch(batch: &BatchResult, duration: Duration) -> Self {
        let scores: Vec<f64> = batch
            .results
            .iter()
            .filter(|r| !r.is_failure())
            .map(|r| r.match_percentage)
            .collect();

        let mean_match = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        Self {
            documents: batch.count,
            completed: scores.len(),
            failed: batch.failures(),
            best_match: scores.iter().copied().reduce(f64::max),
            mean_match,
            duration_secs: duration.as_secs_f64(),
        }
    }

    pub fn documents_per_minute(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.documents as f64 / self.duration_secs * 60.0
    }

    pub fn success_rate(&self) -> f64 {
        if self.documents == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.documents as f64) * 100.0
    }
}

/// One overall bar counting finished documents plus one bar per document.
pub struct ProgressTracker {
    multi: MultiProgress,
    main_bar: ProgressBar,
    item_bars: Mutex<HashMap<String, ProgressBar>>,
    colored: bool,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl ProgressTracker {
    pub fn with_color(total_items: usize, colored: bool) -> Self {
        Self::build(MultiProgress::new(), total_items, colored)
    }

    /// Tracks without drawing anything.
    pub fn hidden(total_items: usize) -> Self {
        Self::build(
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            total_items,
            false,
        )
    }

    fn build(multi: MultiProgress, total_items: usize, colored: bool) -> Self {
        let main_bar = multi.add(ProgressBar::new(total_items as u64));
        main_bar.set_style(main_style(colored));
        main_bar.set_message("Screening");

        Self {
            multi,
            main_bar,
            item_bars: Mutex::new(HashMap::new()),
            colored,
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    pub fn observe(&self, event: &ProgressEvent) {
        let Ok(mut bars) = self.item_bars.lock() else {
            return;
        };

        let bar = bars.entry(event.item_id.clone()).or_insert_with(|| {
            let bar = self.multi.add(ProgressBar::new(100));
            bar.set_style(item_style(self.colored));
            bar.set_prefix(event.filename.clone());
            bar
        });

        bar.set_position(event.progress.round() as u64);
        bar.set_message(event.message.clone());

        match event.status {
            ItemStatus::Completed => {
                self.completed.fetch_add(1, Ordering::SeqCst);
                bar.finish();
                self.main_bar.inc(1);
            }
            ItemStatus::Error => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                bar.abandon();
                self.main_bar.inc(1);
            }
            _ => {}
        }

        self.update_main_message();
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Screening complete");
    }

    fn update_main_message(&self) {
        self.main_bar
            .set_message(format!("Completed: {} | Failed: {}", self.completed(), self.failed()));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if !self.main_bar.is_finished() {
            self.main_bar.abandon();
        }
    }
}

fn main_style(colored: bool) -> ProgressStyle {
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            "█▓▒░",
        )
    } else {
        ("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}", "=>-")
    };

    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(chars)
}

fn item_style(colored: bool) -> ProgressStyle {
    let template = if colored {
        "  {prefix:24.bold} [{bar:30.green/white}] {pos:>3}% {msg}"
    } else {
        "  {prefix:24} [{bar:30}] {pos:>3}% {msg}"
    };

    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisReport, ItemResult};

    fn result(name: &str, score: f64) -> ItemResult {
        let report = AnalysisReport {
            match_percentage: Some(score),
            ..Default::default()
        };
        ItemResult::from_report(name, name, report)
    }

    #[test]
    fn test_batch_stats_ignore_failures_in_match_figures() {
        let batch = BatchResult::ranked(vec![
            result("a", 80.0),
            result("b", 60.0),
            ItemResult::failed("c", "c", "broken".to_string(), "broken".to_string()),
        ]);

        let stats = BatchStats::from_batch(&batch, Duration::from_secs(30));

        assert_eq!(stats.documents, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.best_match, Some(80.0));
        assert_eq!(stats.mean_match, 70.0);
        assert_eq!(stats.documents_per_minute(), 6.0);
        assert!((stats.success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_batch_stats_empty() {
        let stats = BatchStats::from_batch(&BatchResult::default(), Duration::ZERO);
        assert_eq!(stats.best_match, None);
        assert_eq!(stats.documents_per_minute(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_tracker_counts_terminal_events() {
        let tracker = ProgressTracker::hidden(2);

        tracker.observe(&ProgressEvent::new("1", "a.pdf", ItemStatus::Analyzing, 40.0, "Analyzing"));
        tracker.observe(&ProgressEvent::new("1", "a.pdf", ItemStatus::Completed, 100.0, "Done"));
        tracker.observe(&ProgressEvent::new("2", "a.pdf", ItemStatus::Error, 100.0, "Error"));

        assert_eq!(tracker.completed(), 1);
        assert_eq!(tracker.failed(), 1);
        assert_eq!(tracker.item_bars.lock().unwrap().len(), 2);
        tracker.finish();
    }
}
