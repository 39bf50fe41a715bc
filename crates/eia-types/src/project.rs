//! Project description submitted for assessment

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Development category of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Residential,
    Commercial,
    Industrial,
    Infrastructure,
    MixedUse,
    Tourism,
    Energy,
}

impl ProjectType {
    pub const ALL: [ProjectType; 7] = [
        ProjectType::Residential,
        ProjectType::Commercial,
        ProjectType::Industrial,
        ProjectType::Infrastructure,
        ProjectType::MixedUse,
        ProjectType::Tourism,
        ProjectType::Energy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Residential => "residential",
            ProjectType::Commercial => "commercial",
            ProjectType::Industrial => "industrial",
            ProjectType::Infrastructure => "infrastructure",
            ProjectType::MixedUse => "mixed_use",
            ProjectType::Tourism => "tourism",
            ProjectType::Energy => "energy",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        ProjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownProjectType(s.to_string()))
    }
}

/// Normalized project record. Built once per request and shared read-only
/// by every calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub location: String,
    /// Gross floor area in m²
    pub size: f64,
    /// Construction duration in months
    pub duration: u32,
    pub budget: f64,
    pub workers: u32,
    pub equipment: Vec<String>,
    /// Distance to the nearest sensitive receptor in metres
    pub nearest_receptor: f64,
    pub soil_type: String,
    /// Wind speed in km/h
    pub wind_speed: f64,
    pub water_usage: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub working_hours: String,
    pub mitigation_measures: Vec<String>,
}

impl ProjectRecord {
    pub const DEFAULT_DURATION: u32 = 24;
    pub const DEFAULT_BUDGET: f64 = 1_000_000.0;
    pub const DEFAULT_WORKERS: u32 = 100;
    pub const DEFAULT_NEAREST_RECEPTOR: f64 = 100.0;
    pub const DEFAULT_SOIL_TYPE: &'static str = "sandy";
    pub const DEFAULT_WIND_SPEED: f64 = 15.0;
    pub const DEFAULT_WATER_USAGE: f64 = 1000.0;
    pub const DEFAULT_LATITUDE: f64 = 25.276987;
    pub const DEFAULT_LONGITUDE: f64 = 55.296249;
    pub const DEFAULT_WORKING_HOURS: &'static str = "07:00-18:00";

    /// Record with every optional attribute at its default value
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        project_type: ProjectType,
        location: impl Into<String>,
        size: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_type,
            location: location.into(),
            size,
            duration: Self::DEFAULT_DURATION,
            budget: Self::DEFAULT_BUDGET,
            workers: Self::DEFAULT_WORKERS,
            equipment: Self::default_equipment(),
            nearest_receptor: Self::DEFAULT_NEAREST_RECEPTOR,
            soil_type: Self::DEFAULT_SOIL_TYPE.to_string(),
            wind_speed: Self::DEFAULT_WIND_SPEED,
            water_usage: Self::DEFAULT_WATER_USAGE,
            latitude: Self::DEFAULT_LATITUDE,
            longitude: Self::DEFAULT_LONGITUDE,
            working_hours: Self::DEFAULT_WORKING_HOURS.to_string(),
            mitigation_measures: Self::default_mitigation_measures(),
        }
    }

    pub fn default_equipment() -> Vec<String> {
        vec![
            "excavator".to_string(),
            "bulldozer".to_string(),
            "crane".to_string(),
        ]
    }

    pub fn default_mitigation_measures() -> Vec<String> {
        vec!["water_spraying".to_string(), "barriers".to_string()]
    }

    /// Lower-cased location used for keyword lookups
    pub fn location_key(&self) -> String {
        self.location.to_lowercase()
    }

    /// Check the record is assessable
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::MissingField("location"));
        }

        let numeric = [
            ("size", self.size),
            ("budget", self.budget),
            ("nearest_receptor", self.nearest_receptor),
            ("wind_speed", self.wind_speed),
            ("water_usage", self.water_usage),
        ];
        for (field, value) in numeric {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidNumber { field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_type_parses_variants() {
        assert_eq!("residential".parse::<ProjectType>(), Ok(ProjectType::Residential));
        assert_eq!("Mixed Use".parse::<ProjectType>(), Ok(ProjectType::MixedUse));
        assert_eq!("mixed-use".parse::<ProjectType>(), Ok(ProjectType::MixedUse));
        assert_eq!(" ENERGY ".parse::<ProjectType>(), Ok(ProjectType::Energy));
    }

    #[test]
    fn test_project_type_rejects_unknown() {
        let err = "spaceport".parse::<ProjectType>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownProjectType("spaceport".into()));
    }

    #[test]
    fn test_new_applies_defaults() {
        let project = ProjectRecord::new("abc12345", "Tower", ProjectType::Commercial, "Dubai", 5000.0);
        assert_eq!(project.duration, 24);
        assert_eq!(project.workers, 100);
        assert_eq!(project.soil_type, "sandy");
        assert_eq!(project.equipment, vec!["excavator", "bulldozer", "crane"]);
        assert_eq!(project.mitigation_measures, vec!["water_spraying", "barriers"]);
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let project = ProjectRecord::new("id", "  ", ProjectType::Residential, "Dubai", 100.0);
        assert_eq!(project.validate(), Err(ValidationError::MissingField("name")));
    }

    #[test]
    fn test_validate_rejects_negative_size() {
        let project = ProjectRecord::new("id", "A", ProjectType::Residential, "Dubai", -1.0);
        assert!(matches!(
            project.validate(),
            Err(ValidationError::InvalidNumber { field: "size", .. })
        ));
    }

    #[test]
    fn test_validate_allows_negative_coordinates() {
        let mut project = ProjectRecord::new("id", "A", ProjectType::Residential, "Riyadh", 10.0);
        project.longitude = -10.5;
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_type_field_serializes_as_type() {
        let project = ProjectRecord::new("id", "A", ProjectType::MixedUse, "Sharjah", 10.0);
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["type"], "mixed_use");
        assert!(json.get("project_type").is_none());
    }
}
