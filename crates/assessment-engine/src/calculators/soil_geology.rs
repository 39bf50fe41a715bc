//! Soil, geotechnical and seismic screening
//!
//! The geological setting is inferred from location keywords and selects
//! a regional soil profile. Contamination risk follows former land use,
//! escalated for sensitive end uses.

use eia_types::{ComplianceStatus, ModuleReport, ModuleResult, ProjectRecord, ProjectType};
use serde::Serialize;

use super::{round_to, Calculator};
use crate::error::CalculatorError;
use crate::patterns::{
    contains_any, HIGH_CONTAMINATION_KEYWORDS, MODERATE_CONTAMINATION_KEYWORDS,
    MOUNTAIN_KEYWORDS, SABKHA_KEYWORDS, SHORELINE_KEYWORDS,
};
use crate::region::{City, Region};

const SAMPLE_COST_USD: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeologicalSetting {
    Coastal,
    InlandPlains,
    SabkhaAreas,
    MountainFoothills,
}

impl GeologicalSetting {
    pub fn from_location(location: &str) -> Self {
        let location = location.to_lowercase();
        if contains_any(&location, SHORELINE_KEYWORDS) {
            GeologicalSetting::Coastal
        } else if contains_any(&location, MOUNTAIN_KEYWORDS) {
            GeologicalSetting::MountainFoothills
        } else if contains_any(&location, SABKHA_KEYWORDS) {
            GeologicalSetting::SabkhaAreas
        } else {
            GeologicalSetting::InlandPlains
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilType {
    SandySoil,
    ClayeySoil,
    SiltySoil,
    CalcareousSoil,
    Sabkha,
    RockOutcrop,
}

impl SoilType {
    pub fn erosion_susceptibility(&self) -> &'static str {
        match self {
            SoilType::SandySoil | SoilType::SiltySoil => "high",
            SoilType::ClayeySoil | SoilType::CalcareousSoil => "medium",
            SoilType::Sabkha => "low",
            SoilType::RockOutcrop => "very_low",
        }
    }

    /// Estimated erosion rate in t/ha/yr
    pub fn erosion_rate(&self) -> f64 {
        match self.erosion_susceptibility() {
            "high" => 15.0,
            "medium" => 8.0,
            _ => 2.0,
        }
    }

    pub fn foundation_suitability(&self) -> &'static str {
        match self {
            SoilType::SandySoil | SoilType::SiltySoil => "suitable_with_treatment",
            SoilType::ClayeySoil => "requires_assessment",
            SoilType::CalcareousSoil => "good",
            SoilType::Sabkha => "poor",
            SoilType::RockOutcrop => "excellent",
        }
    }
}

/// Dominant soil and bearing capacity range (kPa) of a setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilProfile {
    pub soil_type: SoilType,
    pub bearing_capacity_kpa: (f64, f64),
}

/// Regional soil profile. KSA rows are the eastern coast, the central
/// plateau and the western mountains.
pub fn soil_profile(region: Region, setting: GeologicalSetting) -> SoilProfile {
    use GeologicalSetting::*;

    let (soil_type, bearing_capacity_kpa) = match (region, setting) {
        (Region::Uae, Coastal) => (SoilType::SandySoil, (150.0, 300.0)),
        (Region::Uae, InlandPlains) => (SoilType::CalcareousSoil, (200.0, 400.0)),
        (Region::Uae, SabkhaAreas) => (SoilType::Sabkha, (50.0, 150.0)),
        (Region::Uae, MountainFoothills) => (SoilType::RockOutcrop, (500.0, 1000.0)),
        (Region::Ksa, Coastal) => (SoilType::SandySoil, (100.0, 250.0)),
        (Region::Ksa, InlandPlains) => (SoilType::CalcareousSoil, (250.0, 500.0)),
        (Region::Ksa, SabkhaAreas) => (SoilType::Sabkha, (30.0, 120.0)),
        (Region::Ksa, MountainFoothills) => (SoilType::RockOutcrop, (800.0, 1500.0)),
    };
    SoilProfile {
        soil_type,
        bearing_capacity_kpa,
    }
}

fn required_bearing_capacity(project_type: ProjectType) -> f64 {
    match project_type {
        ProjectType::Commercial | ProjectType::Industrial | ProjectType::Infrastructure => 300.0,
        _ => 150.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContaminationRisk {
    Low,
    Moderate,
    High,
}

impl ContaminationRisk {
    /// Risk implied by former land use named in the location
    pub fn from_history(location: &str) -> Self {
        let location = location.to_lowercase();
        if contains_any(&location, HIGH_CONTAMINATION_KEYWORDS) {
            ContaminationRisk::High
        } else if contains_any(&location, MODERATE_CONTAMINATION_KEYWORDS) {
            ContaminationRisk::Moderate
        } else {
            ContaminationRisk::Low
        }
    }

    /// Residential end uses are screened one level higher
    pub fn screened_for(self, project_type: ProjectType) -> Self {
        match project_type {
            ProjectType::Residential | ProjectType::MixedUse => match self {
                ContaminationRisk::Low => ContaminationRisk::Moderate,
                _ => ContaminationRisk::High,
            },
            _ => self,
        }
    }

    /// Samples per 1000 m²
    fn sampling_density(&self) -> f64 {
        match self {
            ContaminationRisk::High => 1.0,
            ContaminationRisk::Moderate => 0.5,
            ContaminationRisk::Low => 0.2,
        }
    }

    pub fn samples_required(&self, size: f64) -> u64 {
        ((size / 1000.0 * self.sampling_density()) as u64).max(5)
    }
}

/// Seismic zone and peak ground acceleration (g)
pub fn seismic_zone(city: City) -> (&'static str, f64) {
    match city {
        City::Dubai => ("zone_2", 0.10),
        City::AbuDhabi => ("zone_2", 0.08),
        City::Sharjah => ("zone_2", 0.10),
        City::Riyadh => ("zone_1", 0.05),
        City::Jeddah => ("zone_2", 0.12),
        City::Other => ("zone_2", 0.10),
    }
}

pub fn seismic_hazard_level(pga: f64) -> &'static str {
    if pga >= 0.2 {
        "high"
    } else if pga >= 0.1 {
        "moderate"
    } else {
        "low"
    }
}

#[derive(Debug, Serialize)]
struct SoilDetails {
    soil_type: SoilType,
    geological_setting: GeologicalSetting,
    bearing_capacity_range: String,
    erosion_risk: &'static str,
    soil_loss_potential_tons_year: f64,
    contamination_risk: ContaminationRisk,
    samples_required: u64,
    sampling_cost: f64,
    seismic_zone: &'static str,
    peak_ground_acceleration: f64,
    seismic_hazard_level: &'static str,
    foundation_suitability: &'static str,
    ground_improvement_required: bool,
}

pub struct SoilGeologyCalculator;

impl Calculator for SoilGeologyCalculator {
    fn evaluate(&self, project: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
        let region = Region::from_location(&project.location);
        let setting = GeologicalSetting::from_location(&project.location);
        let profile = soil_profile(region, setting);
        let soil = profile.soil_type;

        let (min_capacity, max_capacity) = profile.bearing_capacity_kpa;
        let bearing_adequate = max_capacity >= required_bearing_capacity(project.project_type);
        let foundation = soil.foundation_suitability();

        let contamination =
            ContaminationRisk::from_history(&project.location).screened_for(project.project_type);
        let samples = contamination.samples_required(project.size);

        let (zone, pga) = seismic_zone(City::from_location(&project.location));

        let details = SoilDetails {
            soil_type: soil,
            geological_setting: setting,
            bearing_capacity_range: format!("{}-{} kPa", min_capacity, max_capacity),
            erosion_risk: soil.erosion_susceptibility(),
            soil_loss_potential_tons_year: round_to(project.size / 10_000.0 * soil.erosion_rate(), 1),
            contamination_risk: contamination,
            samples_required: samples,
            sampling_cost: samples as f64 * SAMPLE_COST_USD,
            seismic_zone: zone,
            peak_ground_acceleration: pga,
            seismic_hazard_level: seismic_hazard_level(pga),
            foundation_suitability: foundation,
            ground_improvement_required: !bearing_adequate || foundation == "poor",
        };

        let compliance = if contamination == ContaminationRisk::Low {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::InvestigationRequired
        };

        let mut report = ModuleReport::from_details(&details, Some(compliance))?;
        if contamination != ContaminationRisk::Low {
            report = report.with_issue("Soil contamination risk requires investigation");
        }

        Ok(ModuleResult::Assessed(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(location: &str, project_type: ProjectType) -> ModuleReport {
        let project = ProjectRecord::new("p1", "Test", project_type, location, 10_000.0);
        match SoilGeologyCalculator.evaluate(&project).unwrap() {
            ModuleResult::Assessed(report) => report,
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_setting_from_location() {
        assert_eq!(GeologicalSetting::from_location("JBR Beach"), GeologicalSetting::Coastal);
        assert_eq!(
            GeologicalSetting::from_location("Jebel Hafeet"),
            GeologicalSetting::MountainFoothills
        );
        assert_eq!(
            GeologicalSetting::from_location("Salt flats"),
            GeologicalSetting::SabkhaAreas
        );
        assert_eq!(GeologicalSetting::from_location("Dubai"), GeologicalSetting::InlandPlains);
    }

    #[test]
    fn test_ksa_profiles_are_region_specific() {
        let coastal = soil_profile(Region::Ksa, GeologicalSetting::Coastal);
        assert_eq!(coastal.soil_type, SoilType::SandySoil);
        assert_eq!(coastal.bearing_capacity_kpa, (100.0, 250.0));

        let mountain = soil_profile(Region::Ksa, GeologicalSetting::MountainFoothills);
        assert_eq!(mountain.bearing_capacity_kpa, (800.0, 1500.0));
    }

    #[test]
    fn test_contamination_escalation() {
        assert_eq!(
            ContaminationRisk::Low.screened_for(ProjectType::Residential),
            ContaminationRisk::Moderate
        );
        assert_eq!(
            ContaminationRisk::Moderate.screened_for(ProjectType::MixedUse),
            ContaminationRisk::High
        );
        assert_eq!(
            ContaminationRisk::Low.screened_for(ProjectType::Commercial),
            ContaminationRisk::Low
        );
    }

    #[test]
    fn test_sampling_has_minimum() {
        assert_eq!(ContaminationRisk::Low.samples_required(10_000.0), 5);
        assert_eq!(ContaminationRisk::High.samples_required(50_000.0), 50);
    }

    #[test]
    fn test_dubai_residential_requires_investigation() {
        let report = evaluate("Dubai", ProjectType::Residential);

        assert_eq!(report.detail("soil_type").unwrap(), "calcareous_soil");
        assert_eq!(report.detail("contamination_risk").unwrap(), "moderate");
        assert_eq!(report.detail("seismic_zone").unwrap(), "zone_2");
        assert_eq!(report.compliance, Some(ComplianceStatus::InvestigationRequired));
        assert_eq!(
            report.critical_issues,
            vec!["Soil contamination risk requires investigation".to_string()]
        );
    }

    #[test]
    fn test_commercial_on_clean_inland_site_is_compliant() {
        let report = evaluate("Riyadh", ProjectType::Commercial);
        assert_eq!(report.compliance, Some(ComplianceStatus::Compliant));
        assert_eq!(report.detail("ground_improvement_required").unwrap(), false);
        assert_eq!(report.detail("seismic_hazard_level").unwrap(), "low");
        assert!(report.critical_issues.is_empty());
    }

    #[test]
    fn test_sabkha_needs_ground_improvement() {
        let report = evaluate("Abu Dhabi sabkha", ProjectType::Industrial);
        assert_eq!(report.detail("foundation_suitability").unwrap(), "poor");
        assert_eq!(report.detail("ground_improvement_required").unwrap(), true);
    }

    #[test]
    fn test_industrial_port_is_high_risk() {
        let report = evaluate("Jebel Ali port", ProjectType::Industrial);
        assert_eq!(report.detail("contamination_risk").unwrap(), "high");
        assert_eq!(report.detail_f64("sampling_cost"), Some(1_500.0));
    }
}
