//! Environmental Management Plan (EMP) roll-up
//!
//! Builds one plan component for each upstream module that produced a
//! result. A component pairs standard mitigation measures with a
//! monitoring programme; the plan summary totals their costs.

use eia_types::modules::{
    AIR_QUALITY, BIOLOGICAL_ENVIRONMENT, NOISE_ASSESSMENT, RISK_ASSESSMENT, SOCIO_ECONOMIC,
    SOIL_GEOLOGY, WASTE_MANAGEMENT, WATER_RESOURCES,
};
use eia_types::{ModuleReport, ModuleResult, ModuleResults, ProjectRecord};
use serde::Serialize;

use super::{round_to, PlanCalculator};
use crate::error::CalculatorError;

/// Share of the monitoring budget that recurs every year
const ANNUAL_MONITORING_SHARE: f64 = 0.8;

#[derive(Debug, Clone, Copy)]
enum MeasureCost {
    /// Fraction of floor area, scaled to USD
    SizeFactor(f64),
    Fixed(f64),
}

#[derive(Debug, Clone, Copy)]
struct StandardMeasure {
    id: &'static str,
    description: &'static str,
    cost: MeasureCost,
}

#[derive(Debug, Clone, Copy)]
enum MonitoringCost {
    PerParameter(f64),
    Flat(f64),
}

/// Template for the component planned for one upstream module
struct ComponentTemplate {
    module: &'static str,
    name: &'static str,
    measures: &'static [StandardMeasure],
    parameters: &'static [&'static str],
    monitoring: MonitoringCost,
}

const fn sized(id: &'static str, description: &'static str, factor: f64) -> StandardMeasure {
    StandardMeasure {
        id,
        description,
        cost: MeasureCost::SizeFactor(factor),
    }
}

const fn fixed(id: &'static str, description: &'static str, cost: f64) -> StandardMeasure {
    StandardMeasure {
        id,
        description,
        cost: MeasureCost::Fixed(cost),
    }
}

static COMPONENTS: [ComponentTemplate; 8] = [
    ComponentTemplate {
        module: AIR_QUALITY,
        name: "Air Quality Management Plan",
        measures: &[
            sized("AQ_001", "Install dust suppression systems", 0.02),
            sized("AQ_002", "Implement vehicle emission controls", 0.01),
            sized("AQ_003", "Schedule activities to avoid adverse weather", 0.005),
        ],
        parameters: &["PM10", "PM2.5", "NO2", "SO2", "TSP"],
        monitoring: MonitoringCost::PerParameter(5000.0),
    },
    ComponentTemplate {
        module: NOISE_ASSESSMENT,
        name: "Noise Management Plan",
        measures: &[
            sized("NS_001", "Install noise barriers around construction sites", 0.015),
            sized("NS_002", "Restrict noisy activities to daytime hours", 0.001),
            sized("NS_003", "Use quieter construction equipment", 0.01),
        ],
        parameters: &["LAeq", "LA10", "LA90", "LAmax"],
        monitoring: MonitoringCost::PerParameter(3000.0),
    },
    ComponentTemplate {
        module: WATER_RESOURCES,
        name: "Water Resources Management Plan",
        measures: &[
            sized("WR_001", "Implement water recycling systems", 0.03),
            sized("WR_002", "Install water-efficient fixtures", 0.02),
            sized("WR_003", "Implement stormwater management", 0.025),
        ],
        parameters: &["pH", "BOD", "COD", "TSS", "Heavy metals", "Hydrocarbons"],
        monitoring: MonitoringCost::PerParameter(4000.0),
    },
    ComponentTemplate {
        module: WASTE_MANAGEMENT,
        name: "Waste Management Plan",
        measures: &[
            sized("WM_001", "Implement waste segregation at source", 0.01),
            sized("WM_002", "Establish recycling programs", 0.015),
            sized("WM_003", "Partner with certified waste facilities", 0.005),
        ],
        parameters: &["Waste generation rates", "Recycling rates"],
        monitoring: MonitoringCost::Flat(6000.0),
    },
    ComponentTemplate {
        module: BIOLOGICAL_ENVIRONMENT,
        name: "Biodiversity Management Plan",
        measures: &[
            sized("BE_001", "Establish construction exclusion zones", 0.001),
            sized("BE_002", "Implement seasonal restrictions", 0.002),
            sized("BE_003", "Restore disturbed habitats", 0.04),
        ],
        parameters: &["Species abundance", "Habitat quality", "Vegetation cover"],
        monitoring: MonitoringCost::PerParameter(8000.0),
    },
    ComponentTemplate {
        module: SOIL_GEOLOGY,
        name: "Soil and Geology Management Plan",
        measures: &[
            sized("SG_001", "Implement erosion control measures", 0.02),
            sized("SG_002", "Conduct soil remediation if contaminated", 0.05),
            sized("SG_003", "Implement ground improvement techniques", 0.03),
        ],
        parameters: &["pH", "Heavy metals", "TPH", "Salinity", "Organic matter"],
        monitoring: MonitoringCost::PerParameter(3500.0),
    },
    ComponentTemplate {
        module: SOCIO_ECONOMIC,
        name: "Socio-Economic Management Plan",
        measures: &[
            sized("SE_001", "Implement community engagement program", 0.01),
            sized("SE_002", "Provide local employment opportunities", 0.005),
            sized("SE_003", "Implement traffic management plan", 0.015),
        ],
        parameters: &["Community satisfaction", "Local employment rates"],
        monitoring: MonitoringCost::Flat(10_000.0),
    },
    ComponentTemplate {
        module: RISK_ASSESSMENT,
        name: "Risk Management Plan",
        measures: &[
            fixed("RM_001", "Establish emergency response procedures", 25_000.0),
            fixed("RM_002", "Implement environmental incident reporting system", 15_000.0),
        ],
        parameters: &["Environmental incidents"],
        monitoring: MonitoringCost::Flat(8000.0),
    },
];

/// Costed plan component for one upstream module
#[derive(Debug, Clone, Serialize)]
pub struct PlanComponent {
    pub module: &'static str,
    pub name: &'static str,
    pub measures: Vec<&'static str>,
    pub monitoring_parameters: usize,
    pub mitigation_cost: f64,
    pub monitoring_cost: f64,
}

impl PlanComponent {
    pub fn implementation_cost(&self) -> f64 {
        self.mitigation_cost + self.monitoring_cost
    }
}

fn plan_component(template: &ComponentTemplate, project: &ProjectRecord) -> PlanComponent {
    let mitigation_cost = template
        .measures
        .iter()
        .map(|m| match m.cost {
            MeasureCost::SizeFactor(factor) => project.size * factor * 100.0,
            MeasureCost::Fixed(cost) => cost,
        })
        .sum();

    let monitoring_cost = match template.monitoring {
        MonitoringCost::PerParameter(cost) => template.parameters.len() as f64 * cost,
        MonitoringCost::Flat(cost) => cost,
    };

    tracing::trace!(
        module = template.module,
        measures = ?template.measures.iter().map(|m| m.description).collect::<Vec<_>>(),
        "planned component"
    );

    PlanComponent {
        module: template.module,
        name: template.name,
        measures: template.measures.iter().map(|m| m.id).collect(),
        monitoring_parameters: template.parameters.len(),
        mitigation_cost,
        monitoring_cost,
    }
}

/// Components for every upstream module that did not fail
pub fn plan_components(project: &ProjectRecord, upstream: &ModuleResults) -> Vec<PlanComponent> {
    COMPONENTS
        .iter()
        // Error entries get no component, unlike a plain presence check on the key
        .filter(|t| matches!(upstream.get(t.module), Some(r) if !r.is_error()))
        .map(|t| plan_component(t, project))
        .collect()
}

#[derive(Debug, Serialize)]
struct ComponentCost {
    name: &'static str,
    implementation_cost: f64,
}

#[derive(Debug, Serialize)]
struct PlanDetails {
    total_components: usize,
    mitigation_measures: usize,
    monitoring_parameters: usize,
    implementation_cost: f64,
    annual_operating_cost: f64,
    components: Vec<ComponentCost>,
    compliance_framework: &'static str,
    monitoring_program: &'static str,
}

pub struct ManagementPlanCalculator;

impl PlanCalculator for ManagementPlanCalculator {
    fn evaluate(
        &self,
        project: &ProjectRecord,
        upstream: &ModuleResults,
    ) -> Result<ModuleResult, CalculatorError> {
        let components = plan_components(project, upstream);

        let monitoring: f64 = components.iter().map(|c| c.monitoring_cost).sum();
        let total: f64 = components.iter().map(PlanComponent::implementation_cost).sum();

        let details = PlanDetails {
            total_components: components.len(),
            mitigation_measures: components.iter().map(|c| c.measures.len()).sum(),
            monitoring_parameters: components.iter().map(|c| c.monitoring_parameters).sum(),
            implementation_cost: round_to(total, 0),
            annual_operating_cost: round_to(monitoring * ANNUAL_MONITORING_SHARE, 0),
            components: components
                .iter()
                .map(|c| ComponentCost {
                    name: c.name,
                    implementation_cost: round_to(c.implementation_cost(), 0),
                })
                .collect(),
            compliance_framework: "Established",
            monitoring_program: "Comprehensive",
        };

        Ok(ModuleResult::Generated(ModuleReport::from_details(
            &details, None,
        )?))
    }
}
