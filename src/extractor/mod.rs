// file: src/extractor/mod.rs
// description: text extraction collaborator and format dispatch
// reference: internal module structure

pub mod docx;
pub mod pdf;

use crate::error::ExtractionError;
use crate::models::DocumentKind;
use async_trait::async_trait;
use tracing::debug;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;

/// Turns raw document bytes into plain text. No progress signal.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, content: &[u8], kind: &DocumentKind) -> Result<String, ExtractionError>;
}

/// Dispatches on document kind and runs the parsers on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_blocking(content: &[u8], kind: &DocumentKind) -> Result<String, ExtractionError> {
        match kind {
            DocumentKind::Pdf => PdfExtractor::extract(content),
            DocumentKind::Docx => DocxExtractor::extract(content),
            DocumentKind::Doc => Err(ExtractionError::Unsupported(
                "Legacy .doc format is not supported. Please convert the file to .docx format. \
                 You can open the .doc file in Microsoft Word and save it as .docx."
                    .to_string(),
            )),
            DocumentKind::Unknown(ext) => Err(ExtractionError::Unsupported(format!(
                ".{}. Supported formats: .pdf, .docx",
                ext
            ))),
        }
    }
}

#[async_trait]
impl Extractor for DocumentExtractor {
    async fn extract(&self, content: &[u8], kind: &DocumentKind) -> Result<String, ExtractionError> {
        debug!("Extracting {} bytes of {}", content.len(), kind);

        let content = content.to_vec();
        let kind = kind.clone();
        tokio::task::spawn_blocking(move || Self::extract_blocking(&content, &kind))
            .await
            .map_err(|e| ExtractionError::Worker(e.to_string()))?
    }
}

/// Collapses runs of blank lines and trims each line.
pub(crate) fn clean_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .fold(Vec::new(), |mut acc: Vec<&str>, line| {
            if !line.is_empty() || acc.last().is_some_and(|last| !last.is_empty()) {
                acc.push(line);
            }
            acc
        })
        .join("\n")
        .trim()
        .to_string()
}
