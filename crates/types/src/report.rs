//! Wire payloads for the three backend endpoints and the aggregated report.
//!
//! Field names mirror the backend contract exactly; optional fields default so
//! older backend builds that omit them still deserialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative urgency the backend attaches to a skill gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(label)
    }
}

/// A competency the backend judges missing or underrepresented, paired with a
/// remediation suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    /// Skill name (e.g., "Kubernetes").
    pub skill: String,
    /// Concrete remediation advice.
    pub suggestion: String,
    /// Urgency ranking; defaults to medium when the backend omits it.
    #[serde(default)]
    pub priority: Priority,
}

/// Success payload of `POST /extract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Text extracted from the uploaded CV.
    pub cv_text: String,
    /// Text extracted from an optional job-description upload.
    #[serde(default)]
    pub jd_text: String,
    /// Extension of the processed file (e.g., ".pdf").
    #[serde(default)]
    pub file_type: String,
    /// Word count of the extracted CV text.
    #[serde(default)]
    pub word_count: usize,
}

/// Request body of `POST /optimize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub candidate_cv_text: String,
}

/// Success payload of `POST /optimize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    /// Score of the CV as submitted, 0-100.
    pub original_cv_score: u8,
    /// Score after optimization, 0-100.
    pub optimized_cv_score: u8,
    /// The rewritten CV text.
    pub optimized_cv_text: String,
    /// Human-readable descriptions of the applied improvements.
    #[serde(default)]
    pub improvements: Vec<String>,
    /// Keywords worth weaving in for applicant-tracking systems.
    #[serde(default)]
    pub ats_keywords: Vec<String>,
}

/// Request body of `POST /skill-gaps`. `jd_text` may be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGapRequest {
    pub cv_text: String,
    pub jd_text: String,
}

/// Success payload of `POST /skill-gaps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGapResponse {
    /// Ordered list of detected gaps; order is meaningful and preserved.
    pub skill_gaps: Vec<SkillGap>,
    /// CV/JD match percentage, present only when a JD was supplied.
    #[serde(default)]
    pub match_score: Option<u8>,
}

/// Success payload of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub ai_provider: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Coarse quality band for a 0-100 score, used for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// 80 and above.
    Strong,
    /// 60 to 79.
    Fair,
    /// Below 60.
    Weak,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        match score {
            80.. => Self::Strong,
            60..=79 => Self::Fair,
            _ => Self::Weak,
        }
    }
}

/// The merged result of one fully successful analysis run.
///
/// Produced atomically: the runner only builds a report once all three steps
/// have succeeded. No partial reports exist anywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Score of the CV as submitted, 0-100.
    pub original_score: u8,
    /// Score after optimization, 0-100.
    pub optimized_score: u8,
    /// The rewritten CV text.
    pub optimized_cv_text: String,
    /// Ordered skill gaps with remediation suggestions.
    pub skill_gaps: Vec<SkillGap>,
    /// Applied improvements, as described by the backend.
    #[serde(default)]
    pub improvements: Vec<String>,
    /// Suggested ATS keywords.
    #[serde(default)]
    pub ats_keywords: Vec<String>,
    /// CV/JD match percentage when a JD was part of the run.
    #[serde(default)]
    pub match_score: Option<u8>,
    /// When the run completed.
    pub completed_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Score improvement, displayed as a signed delta badge (e.g., "+19").
    pub fn delta(&self) -> i16 {
        i16::from(self.optimized_score) - i16::from(self.original_score)
    }

    /// Delta formatted the way the results view shows it.
    pub fn delta_label(&self) -> String {
        format!("{:+}", self.delta())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimize_response_tolerates_missing_optional_fields() {
        let json = r#"{
            "original_cv_score": 55,
            "optimized_cv_score": 78,
            "optimized_cv_text": "..."
        }"#;
        let resp: OptimizeResponse = serde_json::from_str(json).expect("deserialize OptimizeResponse");
        assert_eq!(resp.original_cv_score, 55);
        assert_eq!(resp.optimized_cv_score, 78);
        assert!(resp.improvements.is_empty());
        assert!(resp.ats_keywords.is_empty());
    }

    #[test]
    fn skill_gap_priority_defaults_to_medium() {
        let json = r#"{"skill_gaps": [{"skill": "Kubernetes", "suggestion": "Add a project."}]}"#;
        let resp: SkillGapResponse = serde_json::from_str(json).expect("deserialize SkillGapResponse");
        assert_eq!(resp.skill_gaps[0].priority, Priority::Medium);
        assert_eq!(resp.match_score, None);
    }

    #[test]
    fn skill_gap_priority_parses_lowercase() {
        let gap: SkillGap =
            serde_json::from_str(r#"{"skill": "Docker", "suggestion": "Containerize a project.", "priority": "high"}"#)
                .expect("deserialize SkillGap");
        assert_eq!(gap.priority, Priority::High);
    }

    #[test]
    fn delta_is_exact_difference() {
        let report = AnalysisReport {
            original_score: 62,
            optimized_score: 81,
            optimized_cv_text: String::new(),
            skill_gaps: vec![],
            improvements: vec![],
            ats_keywords: vec![],
            match_score: None,
            completed_at: Utc::now(),
        };
        assert_eq!(report.delta(), 19);
        assert_eq!(report.delta_label(), "+19");
    }

    #[test]
    fn delta_can_be_negative() {
        let report = AnalysisReport {
            original_score: 70,
            optimized_score: 65,
            optimized_cv_text: String::new(),
            skill_gaps: vec![],
            improvements: vec![],
            ats_keywords: vec![],
            match_score: None,
            completed_at: Utc::now(),
        };
        assert_eq!(report.delta_label(), "-5");
    }

    #[test]
    fn score_bands_match_presentation_thresholds() {
        assert_eq!(ScoreBand::of(95), ScoreBand::Strong);
        assert_eq!(ScoreBand::of(80), ScoreBand::Strong);
        assert_eq!(ScoreBand::of(79), ScoreBand::Fair);
        assert_eq!(ScoreBand::of(60), ScoreBand::Fair);
        assert_eq!(ScoreBand::of(59), ScoreBand::Weak);
    }
}
