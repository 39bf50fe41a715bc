// Construction noise at the nearest receptor
use eia_types::{ComplianceStatus, ModuleReport, ModuleResult, ProjectRecord};
use serde::Serialize;

use super::{round_to, Calculator};
use crate::error::CalculatorError;

/// Daytime LAeq limit at residential receptors, dB(A)
pub const NOISE_LIMIT_DB: f64 = 65.0;

/// Floor applied to the predicted level (ambient background)
const BACKGROUND_DB: f64 = 35.0;

/// Level assumed when no equipment is listed
const DEFAULT_SITE_LEVEL_DB: f64 = 60.0;

/// Sound level of a plant item at 10 m, dB(A)
pub fn equipment_level(equipment: &str) -> f64 {
    match equipment.to_lowercase().as_str() {
        "excavator" => 85.0,
        "bulldozer" => 87.0,
        "pile_driver" => 95.0,
        "concrete_mixer" => 85.0,
        "crane" => 75.0,
        "compactor" => 88.0,
        "generator" => 82.0,
        _ => 80.0,
    }
}

/// Logarithmic sum of individual sound levels
pub fn combine_levels(levels: &[f64]) -> f64 {
    let energy: f64 = levels.iter().map(|l| 10f64.powf(l / 10.0)).sum();
    if energy > 0.0 {
        10.0 * energy.log10()
    } else {
        DEFAULT_SITE_LEVEL_DB
    }
}

/// Geometric spreading loss from the 10 m reference distance
pub fn distance_attenuation(distance_m: f64) -> f64 {
    20.0 * (distance_m.max(10.0) / 10.0).log10()
}

/// Correction for the working-hours regime
pub fn working_hours_correction(hours: &str) -> f64 {
    match hours {
        "07:00-18:00" => 0.0,
        "06:00-22:00" => -3.0,
        "24hours" => -10.0,
        _ => 0.0,
    }
}

#[derive(Debug, Serialize)]
struct NoiseDetails {
    source_level_db: f64,
    peak_noise_level: f64,
    continuous_noise_level: f64,
    distance_attenuation_db: f64,
    receptor_distance_m: f64,
    affected_receptors: u32,
    mitigation_required: bool,
}

pub struct NoiseCalculator;

impl Calculator for NoiseCalculator {
    fn evaluate(&self, project: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
        let levels: Vec<f64> = project
            .equipment
            .iter()
            .map(|e| equipment_level(e))
            .collect();

        let combined = combine_levels(&levels);
        let attenuation = distance_attenuation(project.nearest_receptor);
        let correction = working_hours_correction(&project.working_hours);
        let level = (combined - attenuation + correction).max(BACKGROUND_DB);

        let compliance = if level < NOISE_LIMIT_DB {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::NonCompliant
        };

        let details = NoiseDetails {
            source_level_db: round_to(combined, 1),
            peak_noise_level: round_to(level, 1),
            continuous_noise_level: round_to(level - 5.0, 1),
            distance_attenuation_db: round_to(attenuation, 1),
            receptor_distance_m: project.nearest_receptor,
            affected_receptors: ((75.0 - level) / 5.0).max(0.0) as u32,
            mitigation_required: level > NOISE_LIMIT_DB,
        };

        Ok(ModuleResult::Assessed(ModuleReport::from_details(
            &details,
            Some(compliance),
        )?))
    }
}
