//! Environmental risk register, mitigation and residual risk
//!
//! Base severities and probabilities (1-5) from the register are adjusted
//! for project type, size, location sensitivity and duration. Mitigation
//! measures are applied to every risk scoring 10 or more.
//!
//! This module does not emit a compliance token; its outcome is reported
//! through `residual_risk_status`.

use eia_types::{ModuleReport, ModuleResult, ProjectRecord, ProjectType};
use serde::Serialize;

use super::{round_to, Calculator};
use crate::error::CalculatorError;
use crate::patterns::{contains_any, CLIMATE_EXPOSED_KEYWORDS, SENSITIVE_KEYWORDS, URBAN_KEYWORDS};

/// Risks scoring at least this are high priority
pub const HIGH_PRIORITY_SCORE: u32 = 15;

/// Risks scoring at least this receive mitigation
pub const MITIGATION_SCORE: u32 = 10;

/// More high priority risks than this raise a critical issue
const HIGH_PRIORITY_ISSUE_COUNT: usize = 5;

const MAX_COMBINED_EFFECTIVENESS: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPhase {
    Construction,
    Operational,
    Climate,
}

#[derive(Debug, Clone, Copy)]
pub struct RiskTemplate {
    pub id: &'static str,
    pub description: &'static str,
    pub phase: RiskPhase,
    pub base_severity: u32,
    pub base_probability: u32,
}

const fn risk(
    id: &'static str,
    description: &'static str,
    phase: RiskPhase,
    base_severity: u32,
    base_probability: u32,
) -> RiskTemplate {
    RiskTemplate {
        id,
        description,
        phase,
        base_severity,
        base_probability,
    }
}

pub static RISK_REGISTER: [RiskTemplate; 15] = [
    risk("ENV_001", "Soil contamination from fuel/chemical spills", RiskPhase::Construction, 4, 3),
    risk("ENV_002", "Air quality degradation from construction activities", RiskPhase::Construction, 3, 4),
    risk("ENV_003", "Noise pollution exceeding regulatory limits", RiskPhase::Construction, 2, 4),
    risk("ENV_004", "Water resource contamination", RiskPhase::Construction, 4, 3),
    risk("ENV_005", "Habitat destruction and biodiversity loss", RiskPhase::Construction, 4, 5),
    risk("HS_001", "Worker injury from construction activities", RiskPhase::Construction, 4, 3),
    risk("HS_002", "Public safety hazards from construction", RiskPhase::Construction, 3, 2),
    risk("SOC_001", "Community disruption from construction", RiskPhase::Construction, 3, 4),
    risk("REG_001", "Non-compliance with environmental regulations", RiskPhase::Construction, 4, 2),
    risk("OP_ENV_001", "Long-term air quality impacts", RiskPhase::Operational, 3, 3),
    risk("OP_ENV_002", "Water resource depletion", RiskPhase::Operational, 3, 4),
    risk("OP_ENV_003", "Waste management failures", RiskPhase::Operational, 4, 2),
    risk("CC_001", "Extreme heat events", RiskPhase::Climate, 3, 4),
    risk("CC_002", "Water scarcity from climate change", RiskPhase::Climate, 4, 3),
    risk("CC_003", "Coastal impacts from sea level rise", RiskPhase::Climate, 4, 3),
];

#[derive(Debug, Clone, Copy)]
pub struct MitigationMeasure {
    pub id: &'static str,
    pub description: &'static str,
    pub measure_type: &'static str,
    pub effectiveness: f64,
    pub cost: f64,
    pub applicable_risks: &'static [&'static str],
}

pub static MITIGATION_CATALOG: [MitigationMeasure; 9] = [
    MitigationMeasure {
        id: "ENV_MIT_001",
        description: "Implement spill prevention and response procedures",
        measure_type: "Prevention",
        effectiveness: 0.85,
        cost: 25_000.0,
        applicable_risks: &["ENV_001"],
    },
    MitigationMeasure {
        id: "ENV_MIT_002",
        description: "Install dust suppression systems",
        measure_type: "Reduction",
        effectiveness: 0.70,
        cost: 50_000.0,
        applicable_risks: &["ENV_002"],
    },
    MitigationMeasure {
        id: "ENV_MIT_003",
        description: "Implement noise control measures",
        measure_type: "Reduction",
        effectiveness: 0.60,
        cost: 75_000.0,
        applicable_risks: &["ENV_003"],
    },
    MitigationMeasure {
        id: "ENV_MIT_004",
        description: "Install water treatment and recycling systems",
        measure_type: "Prevention",
        effectiveness: 0.80,
        cost: 150_000.0,
        applicable_risks: &["ENV_004", "OP_ENV_002"],
    },
    MitigationMeasure {
        id: "ENV_MIT_005",
        description: "Implement biodiversity offset program",
        measure_type: "Compensation",
        effectiveness: 0.75,
        cost: 200_000.0,
        applicable_risks: &["ENV_005"],
    },
    MitigationMeasure {
        id: "HS_MIT_001",
        description: "Implement comprehensive safety training program",
        measure_type: "Prevention",
        effectiveness: 0.80,
        cost: 30_000.0,
        applicable_risks: &["HS_001"],
    },
    MitigationMeasure {
        id: "HS_MIT_002",
        description: "Install safety barriers and signage",
        measure_type: "Prevention",
        effectiveness: 0.70,
        cost: 15_000.0,
        applicable_risks: &["HS_002"],
    },
    MitigationMeasure {
        id: "SOC_MIT_001",
        description: "Implement community engagement program",
        measure_type: "Reduction",
        effectiveness: 0.65,
        cost: 40_000.0,
        applicable_risks: &["SOC_001"],
    },
    MitigationMeasure {
        id: "REG_MIT_001",
        description: "Establish comprehensive monitoring and reporting system",
        measure_type: "Prevention",
        effectiveness: 0.90,
        cost: 60_000.0,
        applicable_risks: &["REG_001"],
    },
];

/// A register entry adjusted for one project
#[derive(Debug, Clone, Serialize)]
pub struct AssessedRisk {
    pub id: &'static str,
    pub description: &'static str,
    pub phase: RiskPhase,
    pub severity: u32,
    pub probability: u32,
    pub score: u32,
    pub level: &'static str,
}

pub fn risk_level(score: u32) -> &'static str {
    match score {
        s if s >= 20 => "Very High",
        s if s >= 15 => "High",
        s if s >= 10 => "Medium",
        s if s >= 5 => "Low",
        _ => "Very Low",
    }
}

/// Apply a fractional adjustment to a 1-5 rating. Fractions are
/// truncated before the adjustment is applied.
fn adjust(base: u32, adjustment: f64) -> u32 {
    (base + adjustment as u32).clamp(1, 5)
}

fn severity_adjustment(project: &ProjectRecord, location: &str) -> f64 {
    let mut adjustment = match project.project_type {
        ProjectType::Industrial => 1.0,
        ProjectType::Infrastructure => 0.5,
        _ => 0.0,
    };

    if project.size > 50_000.0 {
        adjustment += 1.0;
    } else if project.size > 25_000.0 {
        adjustment += 0.5;
    }

    if contains_any(location, SENSITIVE_KEYWORDS) {
        adjustment += 1.0;
    } else if contains_any(location, URBAN_KEYWORDS) {
        adjustment += 0.5;
    }

    adjustment
}

fn probability_adjustment(project: &ProjectRecord) -> f64 {
    let mut adjustment = if project.duration > 36 {
        1.0
    } else if project.duration > 24 {
        0.5
    } else {
        0.0
    };

    if matches!(
        project.project_type,
        ProjectType::Industrial | ProjectType::Infrastructure
    ) {
        adjustment += 0.5;
    }

    adjustment
}

/// Score every register entry for a project, in register order
pub fn assess_risks(project: &ProjectRecord) -> Vec<AssessedRisk> {
    let location = project.location_key();
    let severity_adj = severity_adjustment(project, &location);
    let probability_adj = probability_adjustment(project);
    let climate_exposed = contains_any(&location, CLIMATE_EXPOSED_KEYWORDS);

    RISK_REGISTER
        .iter()
        .map(|template| {
            let severity = adjust(template.base_severity, severity_adj);
            let mut probability = adjust(template.base_probability, probability_adj);
            if template.phase == RiskPhase::Climate && climate_exposed {
                probability = (probability + 1).min(5);
            }
            let score = severity * probability;

            AssessedRisk {
                id: template.id,
                description: template.description,
                phase: template.phase,
                severity,
                probability,
                score,
                level: risk_level(score),
            }
        })
        .collect()
}

/// Catalog measures covering at least one risk that needs mitigation
pub fn applicable_measures(risks: &[AssessedRisk]) -> Vec<&'static MitigationMeasure> {
    let targeted: Vec<&str> = risks
        .iter()
        .filter(|r| r.score >= MITIGATION_SCORE)
        .map(|r| r.id)
        .collect();

    MITIGATION_CATALOG
        .iter()
        .filter(|m| m.applicable_risks.iter().any(|id| targeted.contains(id)))
        .collect()
}

/// Combined effectiveness of several measures on one risk. The best
/// measure counts fully; the others contribute their mean.
pub fn combined_effectiveness(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let rest = values.iter().sum::<f64>() - max;
    let combined = 1.0 - (1.0 - max) * (1.0 - rest / values.len() as f64);
    combined.min(MAX_COMBINED_EFFECTIVENESS)
}

/// Residual score of a risk after the measures applied to it
pub fn residual_score(risk: &AssessedRisk, measures: &[&MitigationMeasure]) -> f64 {
    let effectiveness: Vec<f64> = measures
        .iter()
        .filter(|m| m.applicable_risks.contains(&risk.id))
        .map(|m| m.effectiveness)
        .collect();
    round_to(f64::from(risk.score) * (1.0 - combined_effectiveness(&effectiveness)), 1)
}

#[derive(Debug, Serialize)]
struct RiskDetails {
    total_risks_identified: usize,
    high_priority_risks: usize,
    construction_risks: usize,
    operational_risks: usize,
    climate_risks: usize,
    highest_risk_score: u32,
    mitigation_measures: Vec<&'static str>,
    mitigation_cost: f64,
    residual_risk_status: &'static str,
}

pub struct RiskCalculator;

impl Calculator for RiskCalculator {
    fn evaluate(&self, project: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
        let risks = assess_risks(project);
        let measures = applicable_measures(&risks);

        let count_phase = |phase: RiskPhase| risks.iter().filter(|r| r.phase == phase).count();
        let high_priority = risks.iter().filter(|r| r.score >= HIGH_PRIORITY_SCORE).count();

        let acceptable = risks
            .iter()
            .all(|r| residual_score(r, &measures) < f64::from(MITIGATION_SCORE));

        let details = RiskDetails {
            total_risks_identified: risks.len(),
            high_priority_risks: high_priority,
            construction_risks: count_phase(RiskPhase::Construction),
            operational_risks: count_phase(RiskPhase::Operational),
            climate_risks: count_phase(RiskPhase::Climate),
            highest_risk_score: risks.iter().map(|r| r.score).max().unwrap_or(0),
            mitigation_measures: measures.iter().map(|m| m.id).collect(),
            mitigation_cost: measures.iter().map(|m| m.cost).sum(),
            residual_risk_status: if acceptable {
                "Acceptable"
            } else {
                "Requires Additional Measures"
            },
        };

        let mut report = ModuleReport::from_details(&details, None)?;
        if high_priority > HIGH_PRIORITY_ISSUE_COUNT {
            report = report.with_issue(format!("{} high priority risks identified", high_priority));
        }

        Ok(ModuleResult::Assessed(report))
    }
}
