//! EIA report rendering
//!
//! Turns a stored assessment into one of three documents:
//!
//! - JSON for API consumers
//! - a self-contained HTML page
//! - a paginated PDF built with lopdf

pub mod error;
pub mod html;
pub mod json;
pub mod pdf;

use std::fmt;
use std::str::FromStr;

use assessment_engine::catalog;
use chrono::{DateTime, Utc};
use eia_types::{AssessmentSummary, ModuleResult, ProjectRecord};
use serde_json::Value;

pub use error::ReportError;

/// Output format of a generated report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Pdf,
    Html,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Html => "text/html; charset=utf-8",
            ReportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ReportFormat::Pdf),
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Everything a renderer needs about one assessment
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub project: &'a ProjectRecord,
    pub assessment_id: &'a str,
    pub summary: &'a AssessmentSummary,
    pub generated_at: DateTime<Utc>,
}

/// A rendered report body
#[derive(Debug, Clone)]
pub enum RenderedReport {
    Pdf(Vec<u8>),
    Html(String),
    Json(Value),
}

pub fn render(input: &ReportInput<'_>, format: ReportFormat) -> Result<RenderedReport, ReportError> {
    tracing::debug!(assessment = input.assessment_id, format = %format, "Rendering report");

    match format {
        ReportFormat::Pdf => pdf::render_pdf(input).map(RenderedReport::Pdf),
        ReportFormat::Html => Ok(RenderedReport::Html(html::render_html(input))),
        ReportFormat::Json => {
            let report_id = eia_types::new_id();
            Ok(RenderedReport::Json(json::render_json(input, &report_id)?))
        }
    }
}

/// Attachment filename for a PDF report, e.g. `EIA_Report_Marina_Tower_20261016.pdf`
pub fn pdf_filename(project_name: &str, generated_at: DateTime<Utc>) -> String {
    let name: String = project_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let name = if name.is_empty() { "Project".to_string() } else { name };
    format!("EIA_Report_{}_{}.pdf", name, generated_at.format("%Y%m%d"))
}

/// Display title of a module key
pub(crate) fn module_title(key: &str) -> String {
    catalog::component(key)
        .map(|c| c.name.to_string())
        .unwrap_or_else(|| key.replace('_', " "))
}

/// Flatten a module entry into label/value rows for tabular rendering
pub(crate) fn module_rows(result: &ModuleResult) -> Vec<(String, String)> {
    match result {
        ModuleResult::Error { message } => vec![("Error".to_string(), message.clone())],
        ModuleResult::Assessed(report) | ModuleResult::Generated(report) => {
            let mut rows: Vec<_> = report
                .details
                .iter()
                .map(|(key, value)| (field_label(key), display_value(value)))
                .collect();
            if let Some(status) = report.compliance {
                rows.push(("Compliance".to_string(), status.to_string()));
            }
            rows
        }
    }
}

fn field_label(key: &str) -> String {
    let mut label = key.replace('_', " ");
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    label
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(|v| !v.is_object()) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(items) => format!("{} entries", items.len()),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, display_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
