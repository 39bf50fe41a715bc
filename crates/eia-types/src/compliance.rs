//! Compliance tokens produced by calculators and the overall verdict

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-module compliance verdict.
///
/// Serialized with the display strings used on the wire
/// ("Compliant", "Review required", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    #[serde(rename = "Compliant")]
    Compliant,
    #[serde(rename = "Non-compliant")]
    NonCompliant,
    #[serde(rename = "Review required")]
    ReviewRequired,
    #[serde(rename = "Mitigation required")]
    MitigationRequired,
    #[serde(rename = "Investigation required")]
    InvestigationRequired,
    #[serde(rename = "Heritage assessment required")]
    HeritageAssessmentRequired,
    #[serde(rename = "Acceptable")]
    Acceptable,
    #[serde(rename = "Requires Additional Measures")]
    RequiresAdditionalMeasures,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::NonCompliant => "Non-compliant",
            ComplianceStatus::ReviewRequired => "Review required",
            ComplianceStatus::MitigationRequired => "Mitigation required",
            ComplianceStatus::InvestigationRequired => "Investigation required",
            ComplianceStatus::HeritageAssessmentRequired => "Heritage assessment required",
            ComplianceStatus::Acceptable => "Acceptable",
            ComplianceStatus::RequiresAdditionalMeasures => "Requires Additional Measures",
        }
    }

    /// Numeric score used by the aggregator
    pub fn score(&self) -> f64 {
        match self {
            ComplianceStatus::Compliant => 100.0,
            ComplianceStatus::ReviewRequired | ComplianceStatus::MitigationRequired => 70.0,
            _ => 40.0,
        }
    }

    /// Whether this verdict counts towards `total_impacts`
    pub fn is_impact(&self) -> bool {
        matches!(
            self,
            ComplianceStatus::NonCompliant
                | ComplianceStatus::ReviewRequired
                | ComplianceStatus::MitigationRequired
        )
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for a whole assessment run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    #[serde(rename = "Compliant")]
    Compliant,
    #[serde(rename = "Review Required")]
    ReviewRequired,
    #[serde(rename = "Error")]
    Error,
}

impl OverallStatus {
    /// Threshold rule: strictly above 80 is compliant
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            OverallStatus::Compliant
        } else {
            OverallStatus::ReviewRequired
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Compliant => "Compliant",
            OverallStatus::ReviewRequired => "Review Required",
            OverallStatus::Error => "Error",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_follow_token_rule() {
        assert_eq!(ComplianceStatus::Compliant.score(), 100.0);
        assert_eq!(ComplianceStatus::ReviewRequired.score(), 70.0);
        assert_eq!(ComplianceStatus::MitigationRequired.score(), 70.0);
        assert_eq!(ComplianceStatus::NonCompliant.score(), 40.0);
        assert_eq!(ComplianceStatus::InvestigationRequired.score(), 40.0);
        assert_eq!(ComplianceStatus::HeritageAssessmentRequired.score(), 40.0);
        assert_eq!(ComplianceStatus::Acceptable.score(), 40.0);
        assert_eq!(ComplianceStatus::RequiresAdditionalMeasures.score(), 40.0);
    }

    #[test]
    fn test_impact_tokens() {
        assert!(ComplianceStatus::NonCompliant.is_impact());
        assert!(ComplianceStatus::ReviewRequired.is_impact());
        assert!(ComplianceStatus::MitigationRequired.is_impact());
        assert!(!ComplianceStatus::Compliant.is_impact());
        assert!(!ComplianceStatus::InvestigationRequired.is_impact());
        assert!(!ComplianceStatus::HeritageAssessmentRequired.is_impact());
    }

    #[test]
    fn test_serializes_as_display_string() {
        let json = serde_json::to_string(&ComplianceStatus::ReviewRequired).unwrap();
        assert_eq!(json, "\"Review required\"");
        let json = serde_json::to_string(&OverallStatus::ReviewRequired).unwrap();
        assert_eq!(json, "\"Review Required\"");
    }

    #[test]
    fn test_overall_threshold_is_strict() {
        assert_eq!(OverallStatus::from_score(80.0), OverallStatus::ReviewRequired);
        assert_eq!(OverallStatus::from_score(80.1), OverallStatus::Compliant);
        assert_eq!(OverallStatus::from_score(0.0), OverallStatus::ReviewRequired);
    }
}
