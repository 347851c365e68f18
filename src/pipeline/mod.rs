// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod budget;
pub mod estimator;
mod orchestrator;
pub mod processor;
mod progress;
mod reporter;

#[cfg(test)]
pub(crate) mod testing;

pub use budget::{BudgetPolicy, TimeBudget};
pub use estimator::Estimator;
pub use orchestrator::BatchOrchestrator;
pub use processor::ItemProcessor;
pub use progress::{BatchStats, ProgressTracker};
pub use reporter::{ItemReporter, ProgressSink};
