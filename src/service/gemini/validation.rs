//! Structural validation of the model's JSON payload
//!
//! Pure text-in, typed-report-out. The validator walks the parsed payload
//! collecting every violation before failing, so a bad response surfaces as
//! one aggregated error instead of the first field that happened to break.

use serde_json::{Map, Value};

use crate::model::{AnalysisReport, RiskLevel};

const VERDICTS: &[&str] = &["True", "Likely True", "Uncertain", "Likely False", "False"];
const TONES: &[&str] = &[
    "Neutral",
    "Emotional",
    "Manipulative",
    "Fear-Based",
    "Conspiratorial",
];
const RISK_LEVELS: &[&str] = &["Low", "Medium", "High"];

const CLAIM_FIELDS: &[&str] = &[
    "claim",
    "verdict",
    "fact_check_probability",
    "confidence",
    "reasoning",
];

/// Aggregated validation failure for a model payload
#[derive(Debug, thiserror::Error)]
#[error("invalid analysis payload: {}", issues.join("; "))]
pub struct ReportValidationError {
    pub issues: Vec<String>,
}

impl ReportValidationError {
    fn single(issue: String) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

/// Validate a literal JSON payload against the analysis schema
///
/// Enforces presence of all top-level fields, integer scores in [0, 100],
/// closed verdict/tone/risk enums, complete claim objects, and consistency
/// of `overall_risk_level` with `summary_score`. An inconsistent risk level
/// is a failure, never silently corrected.
pub fn validate_report(payload: &str) -> Result<AnalysisReport, ReportValidationError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| ReportValidationError::single(format!("not valid JSON: {e}")))?;

    let root = value
        .as_object()
        .ok_or_else(|| ReportValidationError::single("top level is not an object".to_string()))?;

    let mut issues = Vec::new();

    let summary_score = check_score(root, "summary_score", &mut issues);
    check_score(root, "manipulation_score", &mut issues);
    check_score(root, "confidence_overall", &mut issues);

    let risk_level = check_enum(root, "overall_risk_level", RISK_LEVELS, &mut issues);
    check_enum(root, "emotional_tone", TONES, &mut issues);

    match root.get("claims") {
        Some(Value::Array(claims)) => {
            for (i, claim) in claims.iter().enumerate() {
                check_claim(i, claim, &mut issues);
            }
        }
        Some(other) => issues.push(format!("'claims' must be an array, got {other}")),
        None => issues.push("missing required field 'claims'".to_string()),
    }

    // Risk mapping consistency, only meaningful once both fields are shaped right
    if let (Some(score), Some(risk)) = (summary_score, risk_level) {
        let expected = RiskLevel::from_score(score);
        if risk != expected.as_str() {
            issues.push(format!(
                "overall_risk_level '{risk}' is inconsistent with summary_score {score} (expected '{}')",
                expected.as_str()
            ));
        }
    }

    if !issues.is_empty() {
        return Err(ReportValidationError { issues });
    }

    serde_json::from_value(value)
        .map_err(|e| ReportValidationError::single(format!("deserialization failed: {e}")))
}

/// Check a score field: present, an integer, and within [0, 100]
fn check_score(obj: &Map<String, Value>, field: &str, issues: &mut Vec<String>) -> Option<u8> {
    match obj.get(field) {
        None => {
            issues.push(format!("missing required field '{field}'"));
            None
        }
        Some(value) => match value.as_u64() {
            Some(n) if n <= 100 => Some(n as u8),
            _ => {
                issues.push(format!(
                    "'{field}' must be an integer in [0, 100], got {value}"
                ));
                None
            }
        },
    }
}

/// Check a closed string enum field
fn check_enum<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    allowed: &[&str],
    issues: &mut Vec<String>,
) -> Option<&'a str> {
    match obj.get(field) {
        None => {
            issues.push(format!("missing required field '{field}'"));
            None
        }
        Some(value) => match value.as_str() {
            Some(s) if allowed.contains(&s) => Some(s),
            _ => {
                issues.push(format!(
                    "'{field}' must be one of {allowed:?}, got {value}"
                ));
                None
            }
        },
    }
}

fn check_claim(index: usize, claim: &Value, issues: &mut Vec<String>) {
    let Some(obj) = claim.as_object() else {
        issues.push(format!("claim {} is not an object", index + 1));
        return;
    };

    for field in CLAIM_FIELDS {
        if !obj.contains_key(*field) {
            issues.push(format!("claim {} missing required field '{field}'", index + 1));
        }
    }

    if obj.contains_key("verdict") {
        check_enum(obj, "verdict", VERDICTS, issues);
    }
    if obj.contains_key("fact_check_probability") {
        check_score(obj, "fact_check_probability", issues);
    }
    if obj.contains_key("confidence") {
        check_score(obj, "confidence", issues);
    }
    if let Some(reasoning) = obj.get("reasoning") {
        if !reasoning.is_string() {
            issues.push(format!("claim {} 'reasoning' must be a string", index + 1));
        }
    }
    if let Some(text) = obj.get("claim") {
        if !text.is_string() {
            issues.push(format!("claim {} 'claim' must be a string", index + 1));
        }
    }
}
