// file: src/pipeline/processor.rs
// description: drives one document through extraction, analysis and result assembly
// reference: checkpointed progress for extraction, time-estimated progress for analysis

use crate::analyzer::Analyzer;
use crate::config::MonitorConfig;
use crate::error::ItemError;
use crate::extractor::Extractor;
use crate::models::{AnalysisReport, BatchItem, ItemResult, ItemSource, ItemStatus, TargetSpec};
use crate::pipeline::budget::TimeBudget;
use crate::pipeline::estimator::Estimator;
use crate::pipeline::reporter::{ItemReporter, ProgressSink};
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Texts shorter than this (after trimming) are not worth analyzing.
pub const MIN_TEXT_CHARS: usize = 50;

pub const EXTRACTION_START: f64 = 5.0;
pub const EXTRACTION_DONE: f64 = 30.0;
pub const ANALYSIS_CEILING: f64 = 95.0;

pub struct ItemProcessor {
    extractor: Arc<dyn Extractor>,
    analyzer: Arc<dyn Analyzer>,
    estimator: Estimator,
    monitor: MonitorConfig,
    cancel: CancellationToken,
}

impl ItemProcessor {
    pub fn new(
        extractor: Arc<dyn Extractor>,
        analyzer: Arc<dyn Analyzer>,
        monitor: MonitorConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            extractor,
            analyzer,
            estimator: Estimator::from_config(&monitor),
            monitor,
            cancel,
        }
    }

    /// Always produces a result. Every failure is turned into an Error
    /// event plus a zero-scored result.
    pub async fn process(
        &self,
        item: &BatchItem,
        target: &TargetSpec,
        budget: TimeBudget,
        sink: &dyn ProgressSink,
    ) -> ItemResult {
        let mut reporter = ItemReporter::new(sink, item);
        reporter.emit(ItemStatus::Queued, 0.0, "Queued");

        match self.run(item, target, budget, &mut reporter).await {
            Ok(report) => {
                let result = ItemResult::from_report(&item.item_id, &item.display_name, report);
                reporter.finish(
                    ItemStatus::Completed,
                    format!("Completed: {:.0}% match", result.match_percentage),
                );
                result
            }
            Err(err) => {
                warn!(
                    "Failed to process {} at {:.0}%: {}",
                    item.display_name,
                    reporter.progress(),
                    err
                );
                reporter.finish(ItemStatus::Error, format!("Error: {}", err));
                failed_result(item, &err)
            }
        }
    }

    async fn run(
        &self,
        item: &BatchItem,
        target: &TargetSpec,
        mut budget: TimeBudget,
        reporter: &mut ItemReporter<'_>,
    ) -> Result<AnalysisReport, ItemError> {
        if self.cancel.is_cancelled() {
            return Err(ItemError::Cancelled);
        }

        reporter.emit(ItemStatus::Extracting, EXTRACTION_START, "Extracting text");
        let started = Instant::now();
        let limit = budget.call_timeout(
            budget.extraction_secs(),
            self.monitor.call_timeout_factor,
            self.monitor.min_call_timeout_secs,
        );

        let text = self
            .guarded("Extraction", limit, async {
                let content = load_content(&item.source).await?;
                let text = self.extractor.extract(&content, &item.kind).await?;
                Ok::<_, ItemError>(text)
            })
            .await??;

        if budget.revise_after_extraction(started.elapsed()) {
            debug!(
                "Extraction of {} overran its share, budget now {:.1}s",
                item.display_name,
                budget.total_secs()
            );
        }

        let chars = text.trim().chars().count();
        reporter.emit(
            ItemStatus::Extracting,
            EXTRACTION_DONE,
            format!("Extracted {} characters", chars),
        );

        if chars < MIN_TEXT_CHARS {
            return Err(ItemError::InsufficientContent {
                chars,
                minimum: MIN_TEXT_CHARS,
            });
        }

        reporter.emit(ItemStatus::Analyzing, EXTRACTION_DONE, "Analyzing with AI");
        self.analyze_with_monitor(&text, target, &budget, reporter)
            .await
    }

    /// Races the analysis call against a monitor loop that publishes
    /// time-estimated progress. The loop stops as soon as the call resolves.
    async fn analyze_with_monitor(
        &self,
        text: &str,
        target: &TargetSpec,
        budget: &TimeBudget,
        reporter: &mut ItemReporter<'_>,
    ) -> Result<AnalysisReport, ItemError> {
        let phase_secs = budget.analysis_secs();
        let limit = budget.call_timeout(
            phase_secs,
            self.monitor.call_timeout_factor,
            self.monitor.min_call_timeout_secs,
        );
        let analysis = tokio::time::timeout(limit, self.analyzer.analyze(text, target));
        tokio::pin!(analysis);

        let started = Instant::now();
        let tick = self.monitor.tick();
        let min_interval = self.monitor.min_emit_interval();

        loop {
            tokio::select! {
                biased;
                outcome = &mut analysis => {
                    debug!("Analysis resolved after {:.2}s", started.elapsed().as_secs_f64());
                    return match outcome {
                        Ok(report) => report.map_err(ItemError::from),
                        Err(_) => Err(timeout_error("Analysis", limit)),
                    };
                }
                _ = self.cancel.cancelled() => return Err(ItemError::Cancelled),
                _ = tokio::time::sleep(tick) => {
                    let elapsed = started.elapsed().as_secs_f64();
                    let value = self.estimator.estimate(
                        elapsed,
                        phase_secs,
                        EXTRACTION_DONE,
                        ANALYSIS_CEILING,
                    );

                    if reporter.should_emit(value, min_interval, self.monitor.min_delta) {
                        let message = if elapsed < phase_secs {
                            format!("Analyzing with AI ({:.0}s)", elapsed)
                        } else {
                            format!("Still analyzing, taking longer than expected ({:.0}s)", elapsed)
                        };
                        reporter.emit(ItemStatus::Analyzing, value, message);
                    }
                }
            }
        }
    }

    /// Applies the per-call deadline and honors cancellation.
    async fn guarded<T>(
        &self,
        phase: &'static str,
        limit: Duration,
        call: impl Future<Output = T>,
    ) -> Result<T, ItemError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ItemError::Cancelled),
            outcome = tokio::time::timeout(limit, call) => {
                outcome.map_err(|_| timeout_error(phase, limit))
            }
        }
    }
}

fn timeout_error(phase: &'static str, limit: Duration) -> ItemError {
    ItemError::Timeout {
        phase,
        limit_secs: limit.as_secs_f64(),
    }
}

async fn load_content(source: &ItemSource) -> Result<Cow<'_, [u8]>, ItemError> {
    match source {
        ItemSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
        ItemSource::Path(path) => {
            info!("Reading {}", path.display());
            tokio::fs::read(path)
                .await
                .map(Cow::Owned)
                .map_err(|source| ItemError::Read {
                    path: path.clone(),
                    source,
                })
        }
    }
}

fn failed_result(item: &BatchItem, err: &ItemError) -> ItemResult {
    match err {
        ItemError::InsufficientContent { .. } => ItemResult::failed(
            &item.item_id,
            &item.display_name,
            "Could not extract sufficient text from CV".to_string(),
            "Text extraction failed or insufficient content".to_string(),
        ),
        other => ItemResult::failed(
            &item.item_id,
            &item.display_name,
            format!("Error processing CV: {}", other),
            format!("Processing error: {}", other),
        ),
    }
}
