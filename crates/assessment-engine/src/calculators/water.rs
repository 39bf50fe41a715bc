//! Water demand, wastewater generation and water balance
//!
//! Construction demand covers concrete mixing, curing, dust control,
//! worker consumption, equipment washing and landscape establishment.
//! Operational demand is driven by occupancy. The balance compares the
//! reclaimable share of wastewater and stormwater with annual demand and
//! scores it against the regional recycling target.

use eia_types::{ComplianceStatus, ModuleReport, ModuleResult, ProjectRecord, ProjectType};
use serde::Serialize;

use super::{occupancy, round_to, Calculator};
use crate::error::CalculatorError;
use crate::region::Region;

/// Score at or above which water use is considered sustainable
pub const SUSTAINABILITY_THRESHOLD: f64 = 60.0;

const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Per-capita domestic consumption, litres/person/day
fn domestic_rate(project_type: ProjectType) -> f64 {
    match project_type {
        ProjectType::Residential => 250.0,
        ProjectType::Commercial => 50.0,
        ProjectType::Tourism => 400.0,
        _ => 250.0,
    }
}

fn has_district_cooling(project_type: ProjectType) -> bool {
    matches!(
        project_type,
        ProjectType::Commercial | ProjectType::Industrial | ProjectType::MixedUse
    )
}

/// Construction phase demand in m³
#[derive(Debug, Clone, Serialize)]
pub struct ConstructionDemand {
    pub concrete_mixing: f64,
    pub curing: f64,
    pub dust_control: f64,
    pub worker_consumption: f64,
    pub equipment_washing: f64,
    pub landscaping: f64,
}

impl ConstructionDemand {
    pub fn total(&self) -> f64 {
        self.concrete_mixing
            + self.curing
            + self.dust_control
            + self.worker_consumption
            + self.equipment_washing
            + self.landscaping
    }
}

/// Operational demand, m³/day except where noted
#[derive(Debug, Clone, Serialize)]
pub struct OperationalDemand {
    pub occupancy: u64,
    pub domestic: f64,
    pub irrigation: f64,
    pub cooling: f64,
    pub cleaning: f64,
    /// Annual fire-fighting reserve turnover, m³/year
    pub fire_fighting_annual: f64,
}

impl OperationalDemand {
    pub fn daily_total(&self) -> f64 {
        self.domestic + self.irrigation + self.cooling + self.cleaning
    }

    pub fn annual_total(&self) -> f64 {
        self.daily_total() * DAYS_PER_YEAR + self.fire_fighting_annual
    }
}

/// One wastewater stream with its reclaimable share
#[derive(Debug, Clone, Serialize)]
pub struct WastewaterStream {
    pub name: &'static str,
    pub annual_m3: f64,
    pub reuse_potential: f64,
}

impl WastewaterStream {
    pub fn recyclable(&self) -> f64 {
        self.annual_m3 * self.reuse_potential
    }
}

pub fn construction_demand(project: &ProjectRecord) -> ConstructionDemand {
    let size = project.size;
    let days = project.duration as f64 * DAYS_PER_MONTH;
    let wash_bays = ((size / 5000.0) as u64).max(5) as f64;

    ConstructionDemand {
        concrete_mixing: size * 0.15 * 0.15,
        curing: size * 0.05,
        dust_control: size * 2.0 / 1000.0 * days,
        worker_consumption: project.workers as f64 * 150.0 / 1000.0 * days,
        equipment_washing: wash_bays * 0.5 * days,
        // 30% landscaped, 10 l/m²/day over a 180-day establishment period
        landscaping: size * 0.3 * 10.0 / 1000.0 * 180.0,
    }
}

pub fn operational_demand(project: &ProjectRecord) -> OperationalDemand {
    let size = project.size;
    let persons = occupancy(project);

    OperationalDemand {
        occupancy: persons,
        domestic: persons as f64 * domestic_rate(project.project_type) / 1000.0,
        irrigation: size * 0.3 * 5.0 / 1000.0,
        cooling: if has_district_cooling(project.project_type) {
            size * 2.0 / 1000.0
        } else {
            0.0
        },
        cleaning: size / 1000.0 / 7.0,
        fire_fighting_annual: size * 0.1 * 0.1,
    }
}

pub fn wastewater_streams(
    demand: &OperationalDemand,
    project: &ProjectRecord,
    region: Region,
) -> Vec<WastewaterStream> {
    vec![
        WastewaterStream {
            name: "domestic_wastewater",
            annual_m3: demand.domestic * 0.8 * DAYS_PER_YEAR,
            reuse_potential: 0.85,
        },
        WastewaterStream {
            name: "cooling_blowdown",
            annual_m3: demand.cooling * 0.2 * DAYS_PER_YEAR,
            reuse_potential: 0.60,
        },
        WastewaterStream {
            name: "stormwater",
            annual_m3: project.size * region.annual_rainfall_mm() * 0.85 / 1_000_000.0,
            reuse_potential: 0.90,
        },
    ]
}

/// Score in [0, 100]: up to 50 for recycling against target, plus fixed
/// credits for efficiency and conservation measures.
pub fn sustainability_score(efficiency_ratio: f64, region: Region) -> f64 {
    let recycling = (efficiency_ratio / region.water_recycling_target() * 50.0).min(50.0);
    (recycling + 30.0 + 20.0).min(100.0)
}

#[derive(Debug, Serialize)]
struct WaterDetails {
    construction_water_demand_m3: f64,
    operational_water_demand_m3_year: f64,
    wastewater_generation_m3_year: f64,
    recycled_water_m3_year: f64,
    water_sustainability_score: f64,
    recycling_potential: f64,
    region: &'static str,
}

pub struct WaterCalculator;

impl Calculator for WaterCalculator {
    fn evaluate(&self, project: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
        let region = Region::from_location(&project.location);

        let construction = construction_demand(project);
        let operational = operational_demand(project);
        let streams = wastewater_streams(&operational, project, region);

        let annual_demand = operational.annual_total();
        let wastewater: f64 = streams.iter().map(|s| s.annual_m3).sum();
        let recycled: f64 = streams.iter().map(WastewaterStream::recyclable).sum();
        let efficiency = if annual_demand > 0.0 {
            recycled / annual_demand
        } else {
            0.0
        };
        let score = round_to(sustainability_score(efficiency, region), 1);

        let compliance = if score > SUSTAINABILITY_THRESHOLD {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::ReviewRequired
        };

        let details = WaterDetails {
            construction_water_demand_m3: round_to(construction.total(), 1),
            operational_water_demand_m3_year: round_to(annual_demand, 1),
            wastewater_generation_m3_year: round_to(wastewater, 1),
            recycled_water_m3_year: round_to(recycled, 1),
            water_sustainability_score: score,
            recycling_potential: round_to(efficiency * 100.0, 1),
            region: region.code(),
        };

        let mut report = ModuleReport::from_details(&details, Some(compliance))?;
        if score < SUSTAINABILITY_THRESHOLD {
            report = report.with_issue("Water sustainability score below threshold");
        }

        Ok(ModuleResult::Assessed(report))
    }
}
