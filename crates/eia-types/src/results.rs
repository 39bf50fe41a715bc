//! Per-module results and the assessment summary

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::compliance::{ComplianceStatus, OverallStatus};

/// Successful output of one calculator
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleReport {
    /// Module-specific fields, flattened into the module entry
    #[serde(flatten)]
    pub details: Map<String, Value>,

    /// Compliance token; modules without one are left out of scoring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceStatus>,

    /// Critical issues raised by this module, in trigger order
    #[serde(skip)]
    pub critical_issues: Vec<String>,
}

impl ModuleReport {
    pub fn new(compliance: Option<ComplianceStatus>) -> Self {
        Self {
            details: Map::new(),
            compliance,
            critical_issues: Vec::new(),
        }
    }

    /// Build a report from a typed details struct. The struct must
    /// serialize to a JSON object.
    pub fn from_details<T: Serialize>(
        details: &T,
        compliance: Option<ComplianceStatus>,
    ) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(details)? {
            Value::Object(map) => Ok(Self {
                details: map,
                compliance,
                critical_issues: Vec::new(),
            }),
            other => Err(serde_json::Error::custom(format!(
                "module details must be an object, got {}",
                other
            ))),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.critical_issues.push(issue.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    pub fn detail_f64(&self, key: &str) -> Option<f64> {
        self.details.get(key).and_then(Value::as_f64)
    }
}

/// Outcome of one calculator invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModuleResult {
    /// Calculator produced an assessment
    Assessed(ModuleReport),
    /// Calculator produced a plan from upstream results
    Generated(ModuleReport),
    /// Calculator failed; the run continued without it
    Error { message: String },
}

impl ModuleResult {
    pub fn error(message: impl Into<String>) -> Self {
        ModuleResult::Error {
            message: message.into(),
        }
    }

    pub fn report(&self) -> Option<&ModuleReport> {
        match self {
            ModuleResult::Assessed(report) | ModuleResult::Generated(report) => Some(report),
            ModuleResult::Error { .. } => None,
        }
    }

    pub fn compliance(&self) -> Option<ComplianceStatus> {
        self.report().and_then(|r| r.compliance)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ModuleResult::Error { .. })
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            ModuleResult::Assessed(_) => "assessed",
            ModuleResult::Generated(_) => "generated",
            ModuleResult::Error { .. } => "error",
        }
    }
}

/// Module results keyed by module name, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleResults {
    entries: Vec<(String, ModuleResult)>,
}

impl ModuleResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result. An existing key keeps its position and is replaced.
    pub fn insert(&mut self, key: impl Into<String>, result: ModuleResult) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = result,
            None => self.entries.push((key, result)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ModuleResult> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, result)| result)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleResult)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }
}

impl FromIterator<(String, ModuleResult)> for ModuleResults {
    fn from_iter<I: IntoIterator<Item = (String, ModuleResult)>>(iter: I) -> Self {
        let mut results = ModuleResults::new();
        for (key, result) in iter {
            results.insert(key, result);
        }
        results
    }
}

impl Serialize for ModuleResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, result) in &self.entries {
            map.serialize_entry(key, result)?;
        }
        map.end()
    }
}

/// Aggregated output of one assessment run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentSummary {
    pub results: ModuleResults,
    pub overall_status: OverallStatus,
    pub total_impacts: usize,
    pub critical_issues: Vec<String>,
    pub compliance_score: f64,
    /// Wall-clock seconds for the whole run
    pub processing_time: f64,
}

impl AssessmentSummary {
    /// Summary for a run whose orchestration itself failed
    pub fn failed(message: &str, processing_time: f64) -> Self {
        Self {
            results: ModuleResults::new(),
            overall_status: OverallStatus::Error,
            total_impacts: 0,
            critical_issues: vec![format!("Assessment error: {}", message)],
            compliance_score: 0.0,
            processing_time,
        }
    }

    /// Number of modules that produced a result (assessed or generated)
    pub fn modules_succeeded(&self) -> usize {
        self.results.iter().filter(|(_, r)| !r.is_error()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_assessed_result_serializes_flat() {
        let report = ModuleReport::new(Some(ComplianceStatus::Compliant))
            .with_detail("pm10_concentration", 72.0)
            .with_issue("not serialized");
        let json = serde_json::to_value(ModuleResult::Assessed(report)).unwrap();

        assert_eq!(
            json,
            json!({
                "status": "assessed",
                "pm10_concentration": 72.0,
                "compliance": "Compliant"
            })
        );
    }

    #[test]
    fn test_error_result_serializes_message() {
        let json = serde_json::to_value(ModuleResult::error("division by zero")).unwrap();
        assert_eq!(json, json!({"status": "error", "message": "division by zero"}));
    }

    #[test]
    fn test_generated_result_omits_missing_compliance() {
        let report = ModuleReport::new(None).with_detail("total_components", 8);
        let json = serde_json::to_value(ModuleResult::Generated(report)).unwrap();
        assert_eq!(json, json!({"status": "generated", "total_components": 8}));
    }

    #[test]
    fn test_from_details_requires_object() {
        #[derive(Serialize)]
        struct Details {
            level: f64,
        }

        let report = ModuleReport::from_details(&Details { level: 3.5 }, None).unwrap();
        assert_eq!(report.detail_f64("level"), Some(3.5));
        assert!(ModuleReport::from_details(&42, None).is_err());
    }

    #[test]
    fn test_results_preserve_insertion_order() {
        let mut results = ModuleResults::new();
        results.insert("zeta", ModuleResult::error("a"));
        results.insert("alpha", ModuleResult::error("b"));
        results.insert("mid", ModuleResult::error("c"));
        results.insert("zeta", ModuleResult::error("replaced"));

        let keys: Vec<_> = results.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(results.get("zeta"), Some(&ModuleResult::error("replaced")));

        let serialized = serde_json::to_string(&results).unwrap();
        let zeta = serialized.find("zeta").unwrap();
        let alpha = serialized.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_failed_summary_shape() {
        let summary = AssessmentSummary::failed("boom", 0.5);
        assert_eq!(summary.overall_status, OverallStatus::Error);
        assert_eq!(summary.total_impacts, 0);
        assert!(summary.results.is_empty());
        assert_eq!(summary.critical_issues, vec!["Assessment error: boom".to_string()]);
    }

    // ============================================================
    // Property tests
    // ============================================================

    mod property_tests {
        use crate::results::{ModuleResult, ModuleResults};
        use proptest::prelude::*;

        proptest! {
            /// Keys keep first-insertion order and the last write wins
            #[test]
            fn insert_keeps_first_position_and_last_value(
                writes in prop::collection::vec((0usize..6, "[a-z]{1,8}"), 0..40),
            ) {
                let mut results = ModuleResults::new();
                let mut expected_keys: Vec<String> = Vec::new();
                for (slot, message) in &writes {
                    let key = format!("module_{}", slot);
                    if !expected_keys.contains(&key) {
                        expected_keys.push(key.clone());
                    }
                    results.insert(key, ModuleResult::error(message.as_str()));
                }

                let keys: Vec<&str> = results.keys().collect();
                prop_assert_eq!(keys, expected_keys.iter().map(String::as_str).collect::<Vec<_>>());
                for key in &expected_keys {
                    let last = writes
                        .iter()
                        .rev()
                        .find(|(slot, _)| format!("module_{}", slot) == *key)
                        .map(|(_, message)| ModuleResult::error(message.as_str()));
                    prop_assert_eq!(results.get(key).cloned(), last);
                }
            }
        }
    }
}
