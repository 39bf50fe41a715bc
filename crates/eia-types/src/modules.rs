//! Canonical module keys, in invocation order

pub const AIR_QUALITY: &str = "air_quality";
pub const NOISE_ASSESSMENT: &str = "noise_assessment";
pub const WATER_RESOURCES: &str = "water_resources";
pub const WASTE_MANAGEMENT: &str = "waste_management";
pub const BIOLOGICAL_ENVIRONMENT: &str = "biological_environment";
pub const SOIL_GEOLOGY: &str = "soil_geology";
pub const SOCIO_ECONOMIC: &str = "socio_economic";
pub const RISK_ASSESSMENT: &str = "risk_assessment";
pub const ENVIRONMENTAL_MANAGEMENT_PLAN: &str = "environmental_management_plan";

/// All module keys in the fixed registration order. The management plan
/// is last because it reads every other module's result.
pub const ASSESSMENT_ORDER: [&str; 9] = [
    AIR_QUALITY,
    NOISE_ASSESSMENT,
    WATER_RESOURCES,
    WASTE_MANAGEMENT,
    BIOLOGICAL_ENVIRONMENT,
    SOIL_GEOLOGY,
    SOCIO_ECONOMIC,
    RISK_ASSESSMENT,
    ENVIRONMENTAL_MANAGEMENT_PLAN,
];
