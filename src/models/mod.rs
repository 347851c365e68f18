// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod item;
pub mod progress;
pub mod result;

pub use item::{BatchItem, DocumentKind, ItemSource, TargetSpec};
pub use progress::{ItemStatus, ProgressEvent};
pub use result::{AnalysisReport, BatchResult, ItemResult, SubScores};
