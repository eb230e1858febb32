//! Domain models for misinformation analysis results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Categorical truth assessment for a single extracted claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Verdict {
    True,
    #[serde(rename = "Likely True")]
    LikelyTrue,
    Uncertain,
    #[serde(rename = "Likely False")]
    LikelyFalse,
    False,
}

/// Emotional register of the analyzed text as judged by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EmotionalTone {
    Neutral,
    Emotional,
    Manipulative,
    #[serde(rename = "Fear-Based")]
    FearBased,
    Conspiratorial,
}

/// Categorical risk summary, derived deterministically from the summary score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Deterministic mapping from summary score: <=30 Low, 31-70 Medium, >70 High
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=30 => RiskLevel::Low,
            31..=70 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Assessment of a single factual claim extracted from the input text
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimResult {
    pub claim: String,
    pub verdict: Verdict,
    /// How objectively verifiable the claim is (0-100)
    pub fact_check_probability: u8,
    pub confidence: u8,
    pub reasoning: String,
}

/// Full validated analysis result returned by the model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisReport {
    pub summary_score: u8,
    pub overall_risk_level: RiskLevel,
    pub claims: Vec<ClaimResult>,
    pub emotional_tone: EmotionalTone,
    pub manipulation_score: u8,
    pub confidence_overall: u8,
}

/// Stored analysis owned by an authenticated user. Immutable once created.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisRecord {
    pub id: i64,
    pub user_id: i64,
    pub original_text: String,
    pub result: AnalysisReport,
    pub created_at: DateTime<Utc>,
}

/// Caller context resolved from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Unauthenticated caller, keyed by client network address
    Anonymous { addr: String },
    Authenticated { user_id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_mapping_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(31), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(71), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn verdict_serializes_to_spaced_strings() {
        assert_eq!(
            serde_json::to_value(Verdict::LikelyFalse).unwrap(),
            serde_json::json!("Likely False")
        );
        assert_eq!(
            serde_json::to_value(EmotionalTone::FearBased).unwrap(),
            serde_json::json!("Fear-Based")
        );
    }
}
