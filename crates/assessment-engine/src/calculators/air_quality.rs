// Construction dust dispersion screening (PM10 / PM2.5 / TSP)
use eia_types::{ComplianceStatus, ModuleReport, ModuleResult, ProjectRecord};
use serde::Serialize;

use super::{round_to, Calculator};
use crate::error::CalculatorError;

/// 24-hour PM10 limit in µg/m³
pub const PM10_LIMIT: f64 = 150.0;

/// Mitigation reductions never exceed this share
const MAX_MITIGATION: f64 = 0.85;

/// Reference wind speed (km/h) at which the wind factor is 1.0
const REFERENCE_WIND_SPEED: f64 = 15.0;

/// Baseline PM10 generated by earthworks on a soil type
pub fn base_pm10(soil_type: &str) -> f64 {
    match soil_type.to_lowercase().as_str() {
        "sandy" => 120.0,
        "clay" => 80.0,
        "rocky" => 60.0,
        "silt" => 100.0,
        _ => 100.0,
    }
}

/// Fractional dust reduction achieved by one mitigation measure
pub fn mitigation_reduction(measure: &str) -> f64 {
    match measure.to_lowercase().as_str() {
        "water_spraying" => 0.40,
        "barriers" => 0.30,
        "covering" => 0.25,
        "dust_suppressant" => 0.50,
        _ => 0.0,
    }
}

#[derive(Debug, Serialize)]
struct AirQualityDetails {
    pm10_concentration: f64,
    pm25_concentration: f64,
    tsp_concentration: f64,
    wind_factor: f64,
    mitigation_effectiveness: f64,
    health_risk: &'static str,
    annual_emissions_tons: f64,
    monitoring_frequency: &'static str,
}

pub struct AirQualityCalculator;

impl Calculator for AirQualityCalculator {
    fn evaluate(&self, project: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
        let base = base_pm10(&project.soil_type);
        let wind_factor = 1.0 + (project.wind_speed - REFERENCE_WIND_SPEED) * 0.05;
        let mitigation = project
            .mitigation_measures
            .iter()
            .map(|m| mitigation_reduction(m))
            .sum::<f64>()
            .min(MAX_MITIGATION);

        let pm10 = base * wind_factor * (1.0 - mitigation);
        let pm25 = pm10 * 0.4;
        let tsp = pm10 * 1.5;

        let health_risk = if pm10 < 100.0 {
            "Low"
        } else if pm10 < PM10_LIMIT {
            "Moderate"
        } else {
            "High"
        };

        let compliance = if pm10 < PM10_LIMIT {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::NonCompliant
        };

        let details = AirQualityDetails {
            pm10_concentration: round_to(pm10, 1),
            pm25_concentration: round_to(pm25, 1),
            tsp_concentration: round_to(tsp, 1),
            wind_factor: round_to(wind_factor, 2),
            mitigation_effectiveness: round_to(mitigation * 100.0, 1),
            health_risk,
            annual_emissions_tons: round_to(pm10 * project.size / 10_000.0 * 0.5, 2),
            monitoring_frequency: "Daily during construction",
        };

        Ok(ModuleResult::Assessed(ModuleReport::from_details(
            &details,
            Some(compliance),
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eia_types::ProjectType;

    fn project(soil: &str, wind: f64, measures: &[&str]) -> ProjectRecord {
        let mut p = ProjectRecord::new("p1", "Test", ProjectType::Residential, "Dubai", 10_000.0);
        p.soil_type = soil.to_string();
        p.wind_speed = wind;
        p.mitigation_measures = measures.iter().map(|m| m.to_string()).collect();
        p
    }

    fn evaluate(p: &ProjectRecord) -> ModuleReport {
        match AirQualityCalculator.evaluate(p).unwrap() {
            ModuleResult::Assessed(report) => report,
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_sandy_site_with_water_spraying_is_compliant() {
        let report = evaluate(&project("sandy", 15.0, &["water_spraying"]));

        assert_eq!(report.detail_f64("pm10_concentration"), Some(72.0));
        assert_eq!(report.detail_f64("pm25_concentration"), Some(28.8));
        assert_eq!(report.detail_f64("tsp_concentration"), Some(108.0));
        assert_eq!(report.compliance, Some(ComplianceStatus::Compliant));
        assert_eq!(report.detail("health_risk").unwrap(), "Low");
    }

    #[test]
    fn test_unmitigated_windy_site_exceeds_limit() {
        let report = evaluate(&project("sandy", 25.0, &[]));

        // 120 * 1.5 = 180
        assert_eq!(report.detail_f64("pm10_concentration"), Some(180.0));
        assert_eq!(report.compliance, Some(ComplianceStatus::NonCompliant));
        assert_eq!(report.detail("health_risk").unwrap(), "High");
    }

    #[test]
    fn test_mitigation_is_capped() {
        let report = evaluate(&project(
            "sandy",
            15.0,
            &["water_spraying", "barriers", "covering", "dust_suppressant"],
        ));

        assert_eq!(report.detail_f64("mitigation_effectiveness"), Some(85.0));
        assert_eq!(report.detail_f64("pm10_concentration"), Some(18.0));
    }

    #[test]
    fn test_unknown_soil_and_measures_use_defaults() {
        let report = evaluate(&project("gravel", 15.0, &["prayer"]));
        assert_eq!(report.detail_f64("pm10_concentration"), Some(100.0));
        assert_eq!(report.detail("health_risk").unwrap(), "Moderate");
    }

    #[test]
    fn test_annual_emissions_scale_with_size() {
        let report = evaluate(&project("sandy", 15.0, &["water_spraying"]));
        // 72 * 10000 / 10000 * 0.5
        assert_eq!(report.detail_f64("annual_emissions_tons"), Some(36.0));
    }
}
