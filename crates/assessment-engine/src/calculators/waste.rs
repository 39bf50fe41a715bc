// Construction and operational waste streams, recycling rates and disposal cost
use eia_types::{ComplianceStatus, ModuleReport, ModuleResult, ProjectRecord, ProjectType};
use serde::Serialize;

use super::{occupancy, round_to, Calculator};
use crate::error::CalculatorError;
use crate::region::Region;

/// Construction recycling rate below which a critical issue is raised
pub const CONSTRUCTION_RECYCLING_FLOOR: f64 = 50.0;

/// Operational disposal costs are projected over this many years
const OPERATIONAL_YEARS: f64 = 20.0;

/// A waste stream: generation rate and recyclable fraction
#[derive(Debug, Clone, Copy)]
struct StreamRate {
    name: &'static str,
    rate: f64,
    recyclable: f64,
}

/// Construction materials, kg per m² of floor area
const CONSTRUCTION_MATERIALS: [StreamRate; 4] = [
    StreamRate { name: "concrete", rate: 85.0, recyclable: 0.85 },
    StreamRate { name: "steel", rate: 12.5, recyclable: 0.95 },
    StreamRate { name: "wood", rate: 8.3, recyclable: 0.70 },
    StreamRate { name: "mixed", rate: 25.0, recyclable: 0.45 },
];

/// Excavated soil, kg per m² of basement
const EXCAVATED_SOIL: StreamRate = StreamRate { name: "excavated_soil", rate: 150.0, recyclable: 0.60 };

/// Operational streams, kg per person per day
const OPERATIONAL_STREAMS: [StreamRate; 3] = [
    StreamRate { name: "municipal", rate: 1.2, recyclable: 0.30 },
    StreamRate { name: "organic", rate: 0.5, recyclable: 0.90 },
    StreamRate { name: "plastic", rate: 0.2, recyclable: 0.75 },
];

const ELECTRONIC: StreamRate = StreamRate { name: "electronic", rate: 0.02, recyclable: 0.80 };

/// Quantities for one phase, in tons
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WasteBalance {
    pub generated: f64,
    pub recycled: f64,
}

impl WasteBalance {
    fn add(&mut self, kg: f64, recyclable: f64) {
        self.generated += kg / 1000.0;
        self.recycled += kg * recyclable / 1000.0;
    }

    pub fn disposal(&self) -> f64 {
        self.generated - self.recycled
    }

    /// Recycling rate in percent
    pub fn recycling_rate(&self) -> f64 {
        if self.generated > 0.0 {
            self.recycled / self.generated * 100.0
        } else {
            0.0
        }
    }
}

/// Basement footprint in m² for the excavated soil stream
fn basement_area(project: &ProjectRecord) -> f64 {
    match project.project_type {
        ProjectType::Commercial | ProjectType::MixedUse | ProjectType::Industrial => {
            project.size * 0.8
        }
        ProjectType::Residential => project.size * 0.3,
        _ => 0.0,
    }
}

pub fn construction_waste(project: &ProjectRecord) -> WasteBalance {
    let mut balance = WasteBalance::default();
    for material in CONSTRUCTION_MATERIALS {
        balance.add(project.size * material.rate, material.recyclable);
    }
    balance.add(basement_area(project) * EXCAVATED_SOIL.rate, EXCAVATED_SOIL.recyclable);
    balance
}

/// Annual operational waste
pub fn operational_waste(project: &ProjectRecord) -> WasteBalance {
    let persons = occupancy(project) as f64;
    let mut streams = OPERATIONAL_STREAMS.to_vec();
    if matches!(
        project.project_type,
        ProjectType::Industrial | ProjectType::Commercial
    ) {
        streams.push(ELECTRONIC);
    }

    let mut balance = WasteBalance::default();
    for stream in &streams {
        balance.add(persons * stream.rate * 365.0, stream.recyclable);
    }
    tracing::trace!(
        streams = ?streams.iter().map(|s| s.name).collect::<Vec<_>>(),
        "operational waste streams"
    );
    balance
}

/// Compliance against both regional recycling targets
pub fn recycling_compliance(
    construction_rate: f64,
    operational_rate: f64,
    region: Region,
) -> ComplianceStatus {
    let (construction_target, operational_target) = region.waste_recycling_targets();
    let met = [
        construction_rate >= construction_target,
        operational_rate >= operational_target,
    ]
    .iter()
    .filter(|m| **m)
    .count();

    match met {
        2 => ComplianceStatus::Compliant,
        1 => ComplianceStatus::ReviewRequired,
        _ => ComplianceStatus::NonCompliant,
    }
}

#[derive(Debug, Serialize)]
struct WasteDetails {
    construction_waste_tons: f64,
    construction_recycling_rate: f64,
    operational_waste_tons_year: f64,
    operational_recycling_rate: f64,
    disposal_cost_per_ton: f64,
    disposal_cost_total: f64,
    region: &'static str,
}

pub struct WasteCalculator;

impl Calculator for WasteCalculator {
    fn evaluate(&self, project: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
        let region = Region::from_location(&project.location);
        let construction = construction_waste(project);
        let operational = operational_waste(project);

        let construction_rate = round_to(construction.recycling_rate(), 1);
        let operational_rate = round_to(operational.recycling_rate(), 1);

        let fee = region.average_disposal_fee();
        let disposal_cost =
            construction.disposal() * fee + operational.disposal() * fee * OPERATIONAL_YEARS;

        let details = WasteDetails {
            construction_waste_tons: round_to(construction.generated, 1),
            construction_recycling_rate: construction_rate,
            operational_waste_tons_year: round_to(operational.generated, 1),
            operational_recycling_rate: operational_rate,
            disposal_cost_per_ton: round_to(fee, 2),
            disposal_cost_total: round_to(disposal_cost, 0),
            region: region.code(),
        };

        let compliance = recycling_compliance(construction_rate, operational_rate, region);
        let mut report = ModuleReport::from_details(&details, Some(compliance))?;
        if construction_rate < CONSTRUCTION_RECYCLING_FLOOR {
            report = report.with_issue("Construction waste recycling rate below 50%");
        }

        Ok(ModuleResult::Assessed(report))
    }
}
