//! Domain calculators
//!
//! Each calculator evaluates one environmental aspect of a project:
//! - Independent calculators see only the project record
//! - Plan calculators additionally read the results of every module
//!   registered before them
//!
//! Calculators return `Err` for failures they detect; the orchestrator
//! turns both errors and panics into error entries.

pub mod air_quality;
pub mod biological;
pub mod management_plan;
pub mod noise;
pub mod risk;
pub mod socio_economic;
pub mod soil_geology;
pub mod waste;
pub mod water;

use eia_types::{ModuleResult, ModuleResults, ProjectRecord};

use crate::error::CalculatorError;

pub use air_quality::AirQualityCalculator;
pub use biological::BiologicalCalculator;
pub use management_plan::ManagementPlanCalculator;
pub use noise::NoiseCalculator;
pub use risk::RiskCalculator;
pub use socio_economic::SocioEconomicCalculator;
pub use soil_geology::SoilGeologyCalculator;
pub use waste::WasteCalculator;
pub use water::WaterCalculator;

/// Calculator that depends only on the project record
pub trait Calculator: Send + Sync {
    fn evaluate(&self, project: &ProjectRecord) -> Result<ModuleResult, CalculatorError>;
}

/// Calculator that consumes earlier modules' results read-only
pub trait PlanCalculator: Send + Sync {
    fn evaluate(
        &self,
        project: &ProjectRecord,
        upstream: &ModuleResults,
    ) -> Result<ModuleResult, CalculatorError>;
}

/// A registered calculator
pub enum Stage {
    Independent(Box<dyn Calculator>),
    Dependent(Box<dyn PlanCalculator>),
}

impl Stage {
    pub fn independent(calculator: impl Calculator + 'static) -> Self {
        Stage::Independent(Box::new(calculator))
    }

    pub fn dependent(calculator: impl PlanCalculator + 'static) -> Self {
        Stage::Dependent(Box::new(calculator))
    }

    pub(crate) fn evaluate(
        &self,
        project: &ProjectRecord,
        upstream: &ModuleResults,
    ) -> Result<ModuleResult, CalculatorError> {
        match self {
            Stage::Independent(calculator) => calculator.evaluate(project),
            Stage::Dependent(calculator) => calculator.evaluate(project, upstream),
        }
    }
}

/// Round to a fixed number of decimals
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Persons accommodated by a development, from its floor area
pub(crate) fn occupancy(project: &ProjectRecord) -> u64 {
    use eia_types::ProjectType::*;

    let area_per_person = match project.project_type {
        Residential => 30.0,
        Commercial => 15.0,
        Industrial => 50.0,
        Infrastructure => 100.0,
        MixedUse => 25.0,
        Tourism | Energy => 30.0,
    };
    ((project.size / area_per_person) as u64).max(10)
}
