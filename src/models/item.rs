// file: src/models/item.rs
// description: batch input items, document kinds and the target specification
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Docx,
    /// Legacy Word format; recognised only so it can be rejected with guidance.
    Doc,
    Unknown(String),
}

impl DocumentKind {
    /// Accepts the extension with or without its leading dot, any case.
    pub fn from_extension(extension: &str) -> Self {
        let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            _ => Self::Unknown(normalized),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or_else(|| Self::Unknown(String::new()))
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "PDF"),
            Self::Docx => write!(f, "DOCX"),
            Self::Doc => write!(f, "DOC"),
            Self::Unknown(ext) if ext.is_empty() => write!(f, "unknown"),
            Self::Unknown(ext) => write!(f, ".{}", ext),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ItemSource {
    Bytes(Vec<u8>),
    /// Read lazily when the item reaches extraction.
    Path(PathBuf),
}

/// One document carried through extraction and analysis.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub item_id: String,
    pub display_name: String,
    pub kind: DocumentKind,
    pub size_bytes: u64,
    pub source: ItemSource,
}

impl BatchItem {
    pub fn from_bytes(display_name: impl Into<String>, content: Vec<u8>) -> Self {
        let display_name = display_name.into();
        let kind = DocumentKind::from_path(Path::new(&display_name));
        Self {
            item_id: new_item_id(),
            size_bytes: content.len() as u64,
            display_name,
            kind,
            source: ItemSource::Bytes(content),
        }
    }

    pub fn from_path(path: PathBuf, size_bytes: u64) -> Self {
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            item_id: new_item_id(),
            display_name,
            kind: DocumentKind::from_path(&path),
            size_bytes,
            source: ItemSource::Path(path),
        }
    }
}

fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// The requirements every item in a batch is measured against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub requirements: String,
}

impl TargetSpec {
    pub fn new(requirements: impl Into<String>) -> Self {
        Self {
            requirements: requirements.into(),
        }
    }
}
