// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Failure of the text extraction collaborator for one document.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported file format: {0}")]
    Unsupported(String),

    #[error("Error extracting text from {kind}: {message}")]
    Malformed { kind: String, message: String },

    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

/// Failure of the analysis collaborator for one document.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Analyzer is not configured: {0}")]
    Configuration(String),

    #[error("Error calling LLM service: {0}")]
    Request(String),

    #[error("LLM service returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("LLM service returned an empty response")]
    EmptyResponse,
}

/// Everything that can end one item early. Always recovered by the item
/// processor into a zero-scored result; never reaches the batch level.
#[derive(Error, Debug)]
pub enum ItemError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Insufficient text extracted ({chars} chars, need at least {minimum})")]
    InsufficientContent { chars: usize, minimum: usize },

    #[error("{phase} did not finish within {limit_secs:.0}s")]
    Timeout { phase: &'static str, limit_secs: f64 },

    #[error("Processing cancelled")]
    Cancelled,
}

/// Failure of the orchestration itself. Distinct from any per-item error.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Batch invariant violated: {0}")]
    Internal(String),

    #[error("Batch task failed: {0}")]
    TaskFailed(String),
}

/// Consumer-side failure; ends the delivery loop but not the batch task.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Failed to serialize stream frame: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stream transport failed: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Stream consumer disconnected")]
    Disconnected,
}
