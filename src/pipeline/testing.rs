// file: src/pipeline/testing.rs
// description: scripted collaborators and recording sinks for pipeline tests
// reference: test doubles behind the extractor and analyzer traits

use crate::analyzer::Analyzer;
use crate::error::{AnalysisError, ExtractionError};
use crate::extractor::Extractor;
use crate::models::{AnalysisReport, BatchItem, DocumentKind, ProgressEvent, TargetSpec};
use crate::pipeline::reporter::ProgressSink;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const FILLER: &str = "Senior engineer with a decade of systems programming, distributed storage \
                      and on-call experience across several production teams.";

/// A document whose text asks the scripted analyzer for `score`.
pub fn cv_item(name: &str, score: f64) -> BatchItem {
    BatchItem::from_bytes(name, format!("SCORE:{} {}", score, FILLER).into_bytes())
}

/// A document whose text is too short to analyze.
pub fn short_item(name: &str) -> BatchItem {
    BatchItem::from_bytes(name, b"Jane Doe".to_vec())
}

/// A document the scripted extractor rejects.
pub fn broken_item(name: &str) -> BatchItem {
    BatchItem::from_bytes(name, b"FAIL unreadable stream".to_vec())
}

/// Returns the bytes as text. Content starting with `FAIL ` is reported as
/// malformed.
#[derive(Default)]
pub struct ScriptedExtractor {
    delay: Option<Duration>,
    hang: bool,
}

impl ScriptedExtractor {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            hang: false,
        }
    }

    /// Never resolves.
    pub fn hanging() -> Self {
        Self {
            delay: None,
            hang: true,
        }
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract(&self, content: &[u8], kind: &DocumentKind) -> Result<String, ExtractionError> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let text = String::from_utf8_lossy(content).to_string();
        match text.strip_prefix("FAIL ") {
            Some(message) => Err(ExtractionError::Malformed {
                kind: kind.to_string(),
                message: message.to_string(),
            }),
            None => Ok(text),
        }
    }
}

/// Scores a text by the `SCORE:<n>` marker it carries. Counts calls.
#[derive(Default)]
pub struct ScriptedAnalyzer {
    calls: AtomicUsize,
    delay: Option<Duration>,
    hang: bool,
}

impl ScriptedAnalyzer {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Never resolves.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, text: &str, _target: &TargetSpec) -> Result<AnalysisReport, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.hang {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let score = text
            .split_whitespace()
            .find_map(|word| word.strip_prefix("SCORE:"))
            .and_then(|value| value.parse::<f64>().ok())
            .ok_or_else(|| AnalysisError::Request("no score marker".to_string()))?;

        Ok(AnalysisReport {
            match_percentage: Some(score),
            skills_match: Some(score),
            experience_match: Some(score),
            education_match: Some(score),
            overall_match: Some(score),
            summary: Some(format!("Scored {}", score)),
            strengths: Some(vec!["Systems programming".to_string()]),
            weaknesses: Some(Vec::new()),
        })
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
