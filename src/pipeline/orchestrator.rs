// file: src/pipeline/orchestrator.rs
// description: runs a batch of documents sequentially and ranks the results
// reference: orchestrates the asynchronous screening workflow

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::error::BatchError;
use crate::extractor::Extractor;
use crate::models::{BatchItem, BatchResult, TargetSpec};
use crate::pipeline::budget::BudgetPolicy;
use crate::pipeline::processor::ItemProcessor;
use crate::pipeline::reporter::ProgressSink;
use crate::stream::ProgressSender;
use crate::utils::telemetry::OperationTimer;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct BatchOrchestrator {
    processor: ItemProcessor,
    budget_policy: BudgetPolicy,
    cancel: CancellationToken,
}

impl BatchOrchestrator {
    pub fn new(config: &Config, extractor: Arc<dyn Extractor>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self::with_cancellation(config, extractor, analyzer, CancellationToken::new())
    }

    pub fn with_cancellation(
        config: &Config,
        extractor: Arc<dyn Extractor>,
        analyzer: Arc<dyn Analyzer>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            processor: ItemProcessor::new(extractor, analyzer, config.monitor.clone(), cancel.clone()),
            budget_policy: BudgetPolicy::new(config.budget.clone()),
            cancel,
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Processes every item in input order, one at a time. Per-item
    /// failures become zero-scored results; only orchestration failures
    /// are returned as errors.
    pub async fn run_batch(
        &self,
        items: Vec<BatchItem>,
        target: &TargetSpec,
        sink: &dyn ProgressSink,
    ) -> Result<BatchResult, BatchError> {
        let total = items.len();
        let timer = OperationTimer::new(&format!("Screening {} documents", total));
        let mut results = Vec::with_capacity(total);

        for (index, item) in items.iter().enumerate() {
            info!(
                "Processing {} ({}/{}, {} bytes)",
                item.display_name,
                index + 1,
                total,
                item.size_bytes
            );

            let budget = self.budget_policy.initial(item.size_bytes);
            let expected = Duration::from_secs_f64(budget.total_secs());
            let item_timer = OperationTimer::quiet(&item.display_name);

            let result = self.processor.process(item, target, budget, sink).await;

            item_timer.warn_if_slow(expected, "processing");
            item_timer.finish();
            results.push(result);
        }

        if results.len() != total {
            error!("Collected {} results for {} items", results.len(), total);
            return Err(BatchError::Internal(format!(
                "expected {} results, collected {}",
                total,
                results.len()
            )));
        }

        let batch = BatchResult::ranked(results);
        info!(
            "Batch finished: {} documents, {} failed",
            batch.count,
            batch.failures()
        );
        timer.finish_with_count(batch.count);

        Ok(batch)
    }

    /// Runs the batch on its own task. The task owns the sender, so the
    /// channel closes once the batch is done.
    pub fn spawn(
        self: Arc<Self>,
        items: Vec<BatchItem>,
        target: TargetSpec,
        sender: ProgressSender,
    ) -> JoinHandle<Result<BatchResult, BatchError>> {
        tokio::spawn(async move { self.run_batch(items, &target, &sender).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemStatus, ProgressEvent};
    use crate::pipeline::testing::{
        RecordingSink, ScriptedAnalyzer, ScriptedExtractor, broken_item, cv_item,
    };
    use crate::stream::progress_channel;
    use pretty_assertions::assert_eq;

    fn orchestrator(analyzer: Arc<ScriptedAnalyzer>) -> BatchOrchestrator {
        BatchOrchestrator::new(
            &Config::default_config(),
            Arc::new(ScriptedExtractor::default()),
            analyzer,
        )
    }

    fn target() -> TargetSpec {
        TargetSpec::new("Rust, distributed systems")
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_item_still_yields_result() {
        let analyzer = Arc::new(ScriptedAnalyzer::default());
        let orchestrator = orchestrator(analyzer.clone());
        let sink = RecordingSink::default();

        let items = vec![
            cv_item("a.pdf", 40.0),
            broken_item("b.pdf"),
            cv_item("c.pdf", 70.0),
        ];
        let broken_id = items[1].item_id.clone();

        let batch = orchestrator.run_batch(items, &target(), &sink).await.unwrap();

        assert_eq!(batch.count, 3);
        assert_eq!(batch.results.len(), 3);
        assert_eq!(analyzer.calls(), 2);

        let broken = batch.results.iter().find(|r| r.item_id == broken_id).unwrap();
        assert_eq!(broken.status, ItemStatus::Error);
        assert_eq!(broken.match_percentage, 0.0);
        assert_eq!(batch.results.last().unwrap().item_id, broken_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_items_are_processed_sequentially() {
        let orchestrator = orchestrator(Arc::new(ScriptedAnalyzer::with_delay(
            Duration::from_millis(500),
        )));
        let sink = RecordingSink::default();
        let items = vec![cv_item("first.pdf", 10.0), cv_item("second.pdf", 20.0)];
        let first = items[0].item_id.clone();

        orchestrator.run_batch(items, &target(), &sink).await.unwrap();

        let events = sink.events();
        let first_terminal = events
            .iter()
            .position(|e| e.item_id == first && e.is_terminal())
            .unwrap();
        let second_start = events.iter().position(|e| e.item_id != first).unwrap();
        assert!(first_terminal < second_start);

        let terminals: Vec<&ProgressEvent> = events.iter().filter(|e| e.is_terminal()).collect();
        assert_eq!(terminals.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_ranked_stably() {
        let orchestrator = orchestrator(Arc::new(ScriptedAnalyzer::default()));
        let sink = RecordingSink::default();
        let items = vec![
            cv_item("A.pdf", 40.0),
            cv_item("B.pdf", 85.0),
            cv_item("C.pdf", 85.0),
            cv_item("D.pdf", 10.0),
        ];

        let batch = orchestrator.run_batch(items, &target(), &sink).await.unwrap();
        let names: Vec<&str> = batch.results.iter().map(|r| r.filename.as_str()).collect();

        assert_eq!(names, vec!["B.pdf", "C.pdf", "A.pdf", "D.pdf"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_names_are_tracked_separately() {
        let orchestrator = orchestrator(Arc::new(ScriptedAnalyzer::default()));
        let sink = RecordingSink::default();
        let items = vec![cv_item("cv.pdf", 30.0), cv_item("cv.pdf", 60.0)];

        let batch = orchestrator.run_batch(items, &target(), &sink).await.unwrap();

        assert_eq!(batch.count, 2);
        assert_ne!(batch.results[0].item_id, batch.results[1].item_id);
        assert_eq!(sink.events().iter().filter(|e| e.is_terminal()).count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch() {
        let orchestrator = orchestrator(Arc::new(ScriptedAnalyzer::default()));
        let sink = RecordingSink::default();

        let batch = orchestrator.run_batch(Vec::new(), &target(), &sink).await.unwrap();

        assert_eq!(batch, BatchResult::default());
        assert!(sink.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_batch_marks_remaining_items() {
        let orchestrator = orchestrator(Arc::new(ScriptedAnalyzer::default()));
        orchestrator.cancellation_token().cancel();
        let sink = RecordingSink::default();

        let batch = orchestrator
            .run_batch(vec![cv_item("a.pdf", 90.0), cv_item("b.pdf", 80.0)], &target(), &sink)
            .await
            .unwrap();

        assert_eq!(batch.count, 2);
        assert_eq!(batch.failures(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_batch_closes_channel() {
        let orchestrator = Arc::new(orchestrator(Arc::new(ScriptedAnalyzer::default())));
        let (sender, mut receiver) = progress_channel();

        let handle = orchestrator.spawn(vec![cv_item("a.pdf", 55.0)], target(), sender);
        let batch = handle.await.unwrap().unwrap();
        assert_eq!(batch.count, 1);

        let mut received = Vec::new();
        while let Some(event) = receiver.try_recv() {
            received.push(event);
        }
        assert!(received.last().unwrap().is_terminal());
        assert!(receiver.is_closed());
    }
}
