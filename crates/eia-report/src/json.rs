//! JSON report document for API consumers

use serde_json::{json, Value};

use crate::{ReportError, ReportInput};

const REGULATORY_COMPLIANCE: &str = "UAE/KSA EIA Requirements";

pub fn render_json(input: &ReportInput<'_>, report_id: &str) -> Result<Value, ReportError> {
    let summary = input.summary;

    Ok(json!({
        "report_id": report_id,
        "assessment_id": input.assessment_id,
        "project_id": input.project.id,
        "generated_at": input.generated_at.to_rfc3339(),
        "project_name": input.project.name,
        "location": input.project.location,
        "compliance_score": summary.compliance_score,
        "overall_status": summary.overall_status,
        "critical_issues": summary.critical_issues,
        "assessment_modules": serde_json::to_value(&summary.results)?,
        "report_metadata": {
            "format": "JSON",
            "regulatory_compliance": REGULATORY_COMPLIANCE,
            "module_count": summary.results.len(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_report_shape() {
        let project = test_support::project();
        let summary = test_support::summary();
        let input = ReportInput {
            project: &project,
            assessment_id: "ffee0011",
            summary: &summary,
            generated_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
        };

        let report = render_json(&input, "0badc0de").unwrap();

        assert_eq!(report["report_id"], "0badc0de");
        assert_eq!(report["assessment_id"], "ffee0011");
        assert_eq!(report["project_id"], "a1b2c3d4");
        assert_eq!(report["generated_at"], "2026-10-16T09:30:00+00:00");
        assert_eq!(report["overall_status"], "Compliant");
        assert_eq!(report["compliance_score"], 100.0);
        assert_eq!(report["report_metadata"]["module_count"], 3);
        assert_eq!(
            report["assessment_modules"]["noise_assessment"],
            json!({"status": "error", "message": "division by zero"})
        );
        assert_eq!(
            report["assessment_modules"]["air_quality"]["compliance"],
            "Compliant"
        );
    }
}
