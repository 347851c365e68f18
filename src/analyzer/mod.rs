// file: src/analyzer/mod.rs
// description: analysis collaborator trait and module exports
// reference: internal module structure

pub mod openai;
pub mod prompt;
pub mod response;

use crate::error::AnalysisError;
use crate::models::{AnalysisReport, TargetSpec};
use async_trait::async_trait;

pub use openai::ChatCompletionAnalyzer;
pub use response::parse_report;

/// Scores extracted text against a target. May return partially populated
/// reports and gives no latency bound.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, text: &str, target: &TargetSpec)
    -> Result<AnalysisReport, AnalysisError>;
}
