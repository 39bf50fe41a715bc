//! Self-contained HTML report

use eia_types::OverallStatus;

use crate::{module_rows, module_title, ReportInput};

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn status_color(status: OverallStatus) -> &'static str {
    match status {
        OverallStatus::Compliant => "#15803d",
        OverallStatus::ReviewRequired => "#b45309",
        OverallStatus::Error => "#b91c1c",
    }
}

pub fn render_html(input: &ReportInput<'_>) -> String {
    let project = input.project;
    let summary = input.summary;

    let issues_html = if summary.critical_issues.is_empty() {
        r#"<p style="color: #666;">No critical issues identified.</p>"#.to_string()
    } else {
        let items: String = summary
            .critical_issues
            .iter()
            .map(|issue| format!("    <li>{}</li>\n", escape_html(issue)))
            .collect();
        format!("<ul>\n{}</ul>", items)
    };

    let mut modules_html = String::new();
    for (key, result) in summary.results.iter() {
        modules_html.push_str(&format!(
            "<section>\n  <h3>{}</h3>\n  <table>\n",
            escape_html(&module_title(key))
        ));
        for (label, value) in module_rows(result) {
            modules_html.push_str(&format!(
                "    <tr><th>{}</th><td>{}</td></tr>\n",
                escape_html(&label),
                escape_html(&value)
            ));
        }
        modules_html.push_str("  </table>\n</section>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>EIA Report - {name}</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 900px; margin: 0 auto; padding: 20px; color: #333; }}
    table {{ border-collapse: collapse; width: 100%; margin-bottom: 20px; }}
    th, td {{ border: 1px solid #ddd; padding: 6px 10px; text-align: left; font-size: 14px; }}
    th {{ background: #f5f5f5; width: 40%; }}
  </style>
</head>
<body>
  <h1>Environmental Impact Assessment Report</h1>
  <p><strong>Project:</strong> {name}<br>
     <strong>Location:</strong> {location}<br>
     <strong>Type:</strong> {project_type}<br>
     <strong>Assessment ID:</strong> {assessment_id}<br>
     <strong>Generated:</strong> {generated_at}</p>

  <h2>Executive Summary</h2>
  <p>Overall status: <strong style="color: {color};">{status}</strong><br>
     Compliance score: <strong>{score:.1}</strong> / 100<br>
     Impacts requiring attention: {impacts}<br>
     Modules assessed: {succeeded} of {total}</p>

  <h2>Critical Issues</h2>
  {issues_html}

  <h2>Assessment Modules</h2>
{modules_html}
  <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">
  <p style="color: #999; font-size: 12px;">Prepared against UAE/KSA EIA requirements.</p>
</body>
</html>"#,
        name = escape_html(&project.name),
        location = escape_html(&project.location),
        project_type = project.project_type,
        assessment_id = escape_html(input.assessment_id),
        generated_at = input.generated_at.format("%B %d, %Y %H:%M UTC"),
        color = status_color(summary.overall_status),
        status = summary.overall_status,
        score = summary.compliance_score,
        impacts = summary.total_impacts,
        succeeded = summary.modules_succeeded(),
        total = summary.results.len(),
        issues_html = issues_html,
        modules_html = modules_html,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use chrono::Utc;

    fn render() -> String {
        let project = test_support::project();
        let summary = test_support::summary();
        render_html(&ReportInput {
            project: &project,
            assessment_id: "ffee0011",
            summary: &summary,
            generated_at: Utc::now(),
        })
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>"a" & 'b'</script>"#),
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_project_name_is_escaped() {
        let html = render();
        assert!(html.contains("Marina &lt;Tower&gt;"));
        assert!(!html.contains("<Tower>"));
    }

    #[test]
    fn test_summary_and_modules_rendered() {
        let html = render();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<strong>100.0</strong> / 100"));
        assert!(html.contains("<li>3 critical species affected</li>"));
        assert!(html.contains("<h3>Air Quality Assessment</h3>"));
        assert!(html.contains("<tr><th>Error</th><td>division by zero</td></tr>"));
        assert!(html.contains("Modules assessed: 2 of 3"));
    }

    #[test]
    fn test_one_section_per_module() {
        let html = render();
        assert_eq!(html.matches("<section>").count(), 3);
        assert_eq!(html.matches("</table>\n</section>\n").count(), 3);
        assert!(html.contains("    <tr><th>Error</th><td>division by zero</td></tr>\n  </table>"));
    }
}
