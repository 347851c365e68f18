// file: src/models/result.rs
// description: analysis reports, per-item results and the ranked batch result
// reference: internal data structures

use crate::models::progress::ItemStatus;
use serde::{Deserialize, Serialize};

pub const NO_SUMMARY: &str = "No summary available";

/// Raw analysis output. Every field is optional because the producer is an
/// external model whose output cannot be trusted to be complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub match_percentage: Option<f64>,
    #[serde(default)]
    pub skills_match: Option<f64>,
    #[serde(default)]
    pub experience_match: Option<f64>,
    #[serde(default)]
    pub education_match: Option<f64>,
    #[serde(default)]
    pub overall_match: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub strengths: Option<Vec<String>>,
    #[serde(default)]
    pub weaknesses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub skills_match: f64,
    pub experience_match: f64,
    pub education_match: f64,
    pub overall_match: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    pub item_id: String,
    pub filename: String,
    pub status: ItemStatus,
    pub match_percentage: f64,
    #[serde(flatten)]
    pub scores: SubScores,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl ItemResult {
    /// Fills absent fields with their documented defaults: scores 0, lists
    /// empty, summary [`NO_SUMMARY`]. Scores are pinned to [0, 100].
    pub fn from_report(item_id: &str, filename: &str, report: AnalysisReport) -> Self {
        Self {
            item_id: item_id.to_string(),
            filename: filename.to_string(),
            status: ItemStatus::Completed,
            match_percentage: pin_score(report.match_percentage),
            scores: SubScores {
                skills_match: pin_score(report.skills_match),
                experience_match: pin_score(report.experience_match),
                education_match: pin_score(report.education_match),
                overall_match: pin_score(report.overall_match),
            },
            summary: report
                .summary
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| NO_SUMMARY.to_string()),
            strengths: report.strengths.unwrap_or_default(),
            weaknesses: report.weaknesses.unwrap_or_default(),
        }
    }

    pub fn failed(item_id: &str, filename: &str, summary: String, reason: String) -> Self {
        Self {
            item_id: item_id.to_string(),
            filename: filename.to_string(),
            status: ItemStatus::Error,
            match_percentage: 0.0,
            scores: SubScores::default(),
            summary,
            strengths: Vec::new(),
            weaknesses: vec![reason],
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == ItemStatus::Error
    }
}

fn pin_score(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 100.0),
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<ItemResult>,
    pub count: usize,
}

impl BatchResult {
    /// Ranks by `match_percentage` descending. `sort_by` is stable, so equal
    /// scores keep their input order.
    pub fn ranked(mut results: Vec<ItemResult>) -> Self {
        results.sort_by(|a, b| b.match_percentage.total_cmp(&a.match_percentage));
        let count = results.len();
        Self { results, count }
    }

    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }
}
