// file: src/analyzer/response.rs
// description: cleanup and tolerant parsing of model replies into analysis reports
// reference: https://docs.rs/regex

use crate::models::AnalysisReport;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

lazy_static! {
    // ```json ... ``` or bare ``` ... ``` fences around the payload
    pub static ref CODE_FENCE: Regex = Regex::new(
        r"(?s)```(?:json|JSON)?\s*(.*?)\s*```"
    ).expect("CODE_FENCE regex is valid");
}

pub const FALLBACK_SUMMARY: &str = "Error parsing LLM response. Manual review recommended.";

pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed)
}

/// Unparseable replies become a neutral report flagged for manual review
/// rather than an item failure. Within a JSON object each field is read on
/// its own, so one mistyped field only loses that field.
pub fn parse_report(content: &str) -> AnalysisReport {
    let payload = strip_code_fence(content);

    let fields = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            warn!("Analysis reply is JSON but not an object: {}", other);
            return fallback_report();
        }
        Err(e) => {
            warn!("Could not parse analysis reply as JSON: {}", e);
            return fallback_report();
        }
    };

    AnalysisReport {
        match_percentage: score_field(&fields, "match_percentage"),
        skills_match: score_field(&fields, "skills_match"),
        experience_match: score_field(&fields, "experience_match"),
        education_match: score_field(&fields, "education_match"),
        overall_match: score_field(&fields, "overall_match"),
        summary: text_field(&fields, "summary"),
        strengths: list_field(&fields, "strengths"),
        weaknesses: list_field(&fields, "weaknesses"),
    }
}

/// Numbers, or numeric strings such as `"85"` and `"85%"`.
fn score_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    let score = match fields.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    if score.is_none() {
        debug!("Ignoring non-numeric {} in analysis reply", key);
    }
    score
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key)?.as_str().map(str::to_string)
}

/// Non-string entries are dropped; anything but an array is ignored.
fn list_field(fields: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let Some(entries) = fields.get(key)?.as_array() else {
        debug!("Ignoring non-list {} in analysis reply", key);
        return None;
    };
    Some(
        entries
            .iter()
            .filter_map(|entry| entry.as_str().map(str::to_string))
            .collect(),
    )
}

pub fn fallback_report() -> AnalysisReport {
    AnalysisReport {
        match_percentage: Some(50.0),
        skills_match: Some(50.0),
        experience_match: Some(50.0),
        education_match: Some(50.0),
        overall_match: Some(50.0),
        summary: Some(FALLBACK_SUMMARY.to_string()),
        strengths: Some(Vec::new()),
        weaknesses: Some(vec!["Could not complete automated analysis".to_string()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_json_fence() {
        let reply = "```json\n{\"match_percentage\": 80}\n```";
        assert_eq!(strip_code_fence(reply), "{\"match_percentage\": 80}");
    }

    #[test]
    fn test_strip_bare_fence_and_plain_reply() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = r#"```json
{
    "match_percentage": 81,
    "skills_match": 90,
    "experience_match": 70,
    "education_match": 60,
    "overall_match": 80,
    "summary": "Strong backend profile.",
    "strengths": ["Rust", "Distributed systems"],
    "weaknesses": ["No people management"]
}
```"#;
        let report = parse_report(reply);
        assert_eq!(report.match_percentage, Some(81.0));
        assert_eq!(report.education_match, Some(60.0));
        assert_eq!(
            report.strengths,
            Some(vec!["Rust".to_string(), "Distributed systems".to_string()])
        );
    }

    #[test]
    fn test_mistyped_fields_only_lose_themselves() {
        let reply = r#"{
            "match_percentage": "85",
            "skills_match": 90,
            "experience_match": "72.5%",
            "education_match": "n/a",
            "overall_match": 80,
            "summary": "Strong Rust profile.",
            "strengths": "Rust, Go",
            "weaknesses": ["Little frontend work", 3]
        }"#;

        let report = parse_report(reply);

        assert_eq!(report.match_percentage, Some(85.0));
        assert_eq!(report.skills_match, Some(90.0));
        assert_eq!(report.experience_match, Some(72.5));
        assert_eq!(report.education_match, None);
        assert_eq!(report.summary.as_deref(), Some("Strong Rust profile."));
        assert_eq!(report.strengths, None);
        assert_eq!(report.weaknesses, Some(vec!["Little frontend work".to_string()]));
    }

    #[test]
    fn test_mistyped_fields_get_result_defaults() {
        let report = parse_report(r#"{"match_percentage": "85", "strengths": 12, "summary": 7}"#);
        let result = crate::models::ItemResult::from_report("id", "cv.pdf", report);

        assert_eq!(result.match_percentage, 85.0);
        assert_eq!(result.scores.skills_match, 0.0);
        assert!(result.strengths.is_empty());
        assert_eq!(result.summary, crate::models::result::NO_SUMMARY);
    }

    #[test]
    fn test_non_object_json_falls_back() {
        assert_eq!(parse_report("[1, 2, 3]"), fallback_report());
    }

    #[test]
    fn test_unparseable_reply_falls_back() {
        let report = parse_report("I am sorry, I cannot do that.");
        assert_eq!(report, fallback_report());
        assert_eq!(report.summary.as_deref(), Some(FALLBACK_SUMMARY));
    }
}
