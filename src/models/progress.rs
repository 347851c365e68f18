// file: src/models/progress.rs
// description: per-item progress events and the item status state machine
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// Item lifecycle. Variants are declared in lifecycle order so `Ord`
/// reflects forward movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Queued,
    Extracting,
    Analyzing,
    Completed,
    Error,
}

impl ItemStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub item_id: String,
    pub filename: String,
    pub status: ItemStatus,
    pub progress: f64,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(
        item_id: impl Into<String>,
        filename: impl Into<String>,
        status: ItemStatus,
        progress: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            filename: filename.into(),
            status,
            progress: progress.clamp(0.0, 100.0),
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
