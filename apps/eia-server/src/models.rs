//! Request normalization and API identifiers

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use eia_types::{ProjectRecord, ProjectType};

use crate::error::ServerError;

lazy_static! {
    static ref SHORT_ID: Regex = Regex::new(r"^[0-9a-f]{8}$").unwrap();
}

const REQUIRED_FIELDS: [&str; 4] = ["name", "type", "location", "size"];

pub fn is_valid_id(id: &str) -> bool {
    SHORT_ID.is_match(id)
}

/// Absent, null, blank and zero values count as missing
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(b)) => !b,
    }
}

fn text(body: &Map<String, Value>, field: &str) -> Result<String, ServerError> {
    match body.get(field) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(ServerError::InvalidRequest(format!(
            "Field '{}' must be a string",
            field
        ))),
    }
}

/// Numeric field, accepting numbers or numeric strings
fn number(body: &Map<String, Value>, field: &str, default: f64) -> Result<f64, ServerError> {
    let value = match body.get(field) {
        None | Some(Value::Null) => return Ok(default),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    value.ok_or_else(|| ServerError::InvalidRequest(format!("Field '{}' must be a number", field)))
}

/// Whole-number field; fractional input is truncated
fn count(body: &Map<String, Value>, field: &str, default: u32) -> Result<u32, ServerError> {
    let value = number(body, field, default as f64)?;
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(ServerError::InvalidRequest(format!(
            "Field '{}' must be a non-negative integer",
            field
        )));
    }
    Ok(value as u32)
}

fn string_list(
    body: &Map<String, Value>,
    field: &str,
    default: Vec<String>,
) -> Result<Vec<String>, ServerError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ServerError::InvalidRequest(format!("Field '{}' must list strings", field))
                })
            })
            .collect(),
        Some(_) => Err(ServerError::InvalidRequest(format!(
            "Field '{}' must be an array",
            field
        ))),
    }
}

fn optional_text(body: &Map<String, Value>, field: &str, default: &str) -> Result<String, ServerError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(_) => text(body, field),
    }
}

/// Build a project record from an assessment request body, applying
/// defaults for every optional attribute.
pub fn project_from_request(body: &Value, id: String) -> Result<ProjectRecord, ServerError> {
    let body = body
        .as_object()
        .ok_or_else(|| ServerError::InvalidRequest("Request body must be a JSON object".into()))?;

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| is_missing(body.get(*field)))
        .collect();
    if !missing.is_empty() {
        return Err(ServerError::InvalidRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let project_type: ProjectType = text(body, "type")?.parse()?;

    let mut project = ProjectRecord::new(
        id,
        text(body, "name")?,
        project_type,
        text(body, "location")?,
        number(body, "size", 0.0)?,
    );
    project.duration = count(body, "duration", ProjectRecord::DEFAULT_DURATION)?;
    project.budget = number(body, "budget", ProjectRecord::DEFAULT_BUDGET)?;
    project.workers = count(body, "workers", ProjectRecord::DEFAULT_WORKERS)?;
    project.equipment = string_list(body, "equipment", ProjectRecord::default_equipment())?;
    project.nearest_receptor =
        number(body, "nearest_receptor", ProjectRecord::DEFAULT_NEAREST_RECEPTOR)?;
    project.soil_type = optional_text(body, "soil_type", ProjectRecord::DEFAULT_SOIL_TYPE)?;
    project.wind_speed = number(body, "wind_speed", ProjectRecord::DEFAULT_WIND_SPEED)?;
    project.water_usage = number(body, "water_usage", ProjectRecord::DEFAULT_WATER_USAGE)?;
    project.latitude = number(body, "latitude", ProjectRecord::DEFAULT_LATITUDE)?;
    project.longitude = number(body, "longitude", ProjectRecord::DEFAULT_LONGITUDE)?;
    project.working_hours =
        optional_text(body, "working_hours", ProjectRecord::DEFAULT_WORKING_HOURS)?;
    project.mitigation_measures = string_list(
        body,
        "mitigation_measures",
        ProjectRecord::default_mitigation_measures(),
    )?;

    project.validate()?;
    Ok(project)
}

/// Body of `POST /api/generate-professional-report`
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub project_id: Option<String>,
    pub assessment_id: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eia_types::new_id;
    use serde_json::json;

    fn error_message(err: ServerError) -> String {
        match err {
            ServerError::InvalidRequest(msg) => msg,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_new_ids_are_valid() {
        let id = new_id();
        assert!(is_valid_id(&id), "{}", id);
        assert!(!is_valid_id("ABCDEF12"));
        assert!(!is_valid_id("abc"));
        assert!(!is_valid_id("../../etc"));
    }

    #[test]
    fn test_defaults_applied() {
        let body = json!({"name": "Tower", "type": "residential", "location": "Dubai", "size": 10000});
        let project = project_from_request(&body, "a1b2c3d4".into()).unwrap();

        assert_eq!(project.project_type, ProjectType::Residential);
        assert_eq!(project.size, 10_000.0);
        assert_eq!(project.duration, 24);
        assert_eq!(project.workers, 100);
        assert_eq!(project.working_hours, "07:00-18:00");
        assert_eq!(project.mitigation_measures, vec!["water_spraying", "barriers"]);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let body = json!({
            "name": "Mall", "type": "commercial", "location": "Riyadh",
            "size": "25000", "duration": "36", "wind_speed": 20,
            "equipment": ["crane"],
        });
        let project = project_from_request(&body, "a1b2c3d4".into()).unwrap();
        assert_eq!(project.size, 25_000.0);
        assert_eq!(project.duration, 36);
        assert_eq!(project.wind_speed, 20.0);
        assert_eq!(project.equipment, vec!["crane"]);
    }

    #[test]
    fn test_missing_fields_listed_in_order() {
        let body = json!({"name": "", "location": "Dubai", "size": 0});
        let msg = error_message(project_from_request(&body, "a1b2c3d4".into()).unwrap_err());
        assert_eq!(msg, "Missing required fields: name, type, size");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let body = json!({"name": "A", "type": "spaceport", "location": "Dubai", "size": 10});
        let msg = error_message(project_from_request(&body, "a1b2c3d4".into()).unwrap_err());
        assert_eq!(msg, "Unknown project type: spaceport");
    }

    #[test]
    fn test_negative_numbers_rejected() {
        let body = json!({"name": "A", "type": "industrial", "location": "Jeddah", "size": -5});
        assert!(project_from_request(&body, "a1b2c3d4".into()).is_err());

        let body = json!({"name": "A", "type": "industrial", "location": "Jeddah", "size": 5, "workers": -1});
        assert!(project_from_request(&body, "a1b2c3d4".into()).is_err());
    }

    #[test]
    fn test_non_object_body_rejected() {
        assert!(project_from_request(&json!([1, 2]), "a1b2c3d4".into()).is_err());
    }
}
