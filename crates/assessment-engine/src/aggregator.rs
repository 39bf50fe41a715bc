//! Compliance aggregation over a completed results map

use eia_types::{ModuleResults, OverallStatus};

use crate::calculators::round_to;

/// Cross-module metrics derived from one run
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub overall_status: OverallStatus,
    pub total_impacts: usize,
    pub critical_issues: Vec<String>,
    pub compliance_score: f64,
}

/// Fold per-module results into the overall verdict.
///
/// Only successful modules carrying a compliance token take part in the
/// score and the impact count. Critical issues keep module order.
pub fn aggregate(results: &ModuleResults) -> Aggregate {
    let tokens: Vec<_> = results.iter().filter_map(|(_, r)| r.compliance()).collect();

    let total_impacts = tokens.iter().filter(|t| t.is_impact()).count();

    let compliance_score = if tokens.is_empty() {
        0.0
    } else {
        let sum: f64 = tokens.iter().map(|t| t.score()).sum();
        round_to(sum / tokens.len() as f64, 1)
    };

    let critical_issues = results
        .iter()
        .filter_map(|(_, r)| r.report())
        .flat_map(|report| report.critical_issues.iter().cloned())
        .collect();

    Aggregate {
        overall_status: OverallStatus::from_score(compliance_score),
        total_impacts,
        critical_issues,
        compliance_score,
    }
}
