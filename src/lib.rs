// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

//! Screens a batch of CV documents against job requirements. Items run
//! sequentially through text extraction and an LLM analysis; per-item
//! progress is streamed while the batch runs and the ranked results are
//! delivered once it finishes.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod input;
pub mod models;
pub mod pipeline;
pub mod stream;
pub mod utils;

pub use analyzer::{Analyzer, ChatCompletionAnalyzer};
pub use config::Config;
pub use error::{PipelineError, Result};
pub use extractor::{DocumentExtractor, Extractor};
pub use input::{FileScanner, ScannedFile};
pub use models::{
    BatchItem, BatchResult, DocumentKind, ItemResult, ItemStatus, ProgressEvent, TargetSpec,
};
pub use pipeline::{BatchOrchestrator, BatchStats, ProgressSink, ProgressTracker};
pub use stream::{SseSink, StreamDelivery, StreamFrame, StreamSink, TerminalSink, progress_channel};
pub use utils::{OperationTimer, Validator};
