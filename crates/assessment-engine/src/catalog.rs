//! Static description of the registered assessment components

use eia_types::modules::*;
use serde::Serialize;

/// Public description of one assessment component
#[derive(Debug, Clone, Serialize)]
pub struct ComponentInfo {
    #[serde(skip)]
    pub key: &'static str,
    pub name: &'static str,
    pub status: &'static str,
    pub parameters: &'static [&'static str],
    pub standards: &'static str,
}

const fn active(
    key: &'static str,
    name: &'static str,
    parameters: &'static [&'static str],
    standards: &'static str,
) -> ComponentInfo {
    ComponentInfo {
        key,
        name,
        status: "active",
        parameters,
        standards,
    }
}

/// Components in assessment order
pub static COMPONENTS: [ComponentInfo; 9] = [
    active(
        AIR_QUALITY,
        "Air Quality Assessment",
        &["PM10", "PM2.5", "TSP", "Emissions"],
        "UAE/KSA Air Quality Standards",
    ),
    active(
        NOISE_ASSESSMENT,
        "Noise Impact Assessment",
        &["LAeq", "Peak levels", "Distance attenuation"],
        "Local noise regulations",
    ),
    active(
        WATER_RESOURCES,
        "Water Resources Assessment",
        &["Water demand", "Wastewater", "Water balance", "Recycling"],
        "Regional water conservation targets",
    ),
    active(
        WASTE_MANAGEMENT,
        "Waste Management Assessment",
        &["Construction waste", "Operational waste", "Recycling rates"],
        "Waste management regulations",
    ),
    active(
        BIOLOGICAL_ENVIRONMENT,
        "Biodiversity & Ecology Assessment",
        &["Habitat assessment", "Species impact", "Ecosystem services"],
        "Wildlife protection laws",
    ),
    active(
        SOIL_GEOLOGY,
        "Soil & Geological Assessment",
        &["Soil conditions", "Contamination", "Seismic hazards"],
        "Geotechnical standards",
    ),
    active(
        SOCIO_ECONOMIC,
        "Socio-Economic Impact Assessment",
        &["Demographics", "Traffic", "Cultural heritage", "Health"],
        "Social impact guidelines",
    ),
    active(
        RISK_ASSESSMENT,
        "Comprehensive Risk Assessment",
        &["Environmental risks", "H&S risks", "Climate risks"],
        "Risk management frameworks",
    ),
    active(
        ENVIRONMENTAL_MANAGEMENT_PLAN,
        "Environmental Management Plan",
        &["Mitigation measures", "Monitoring", "Compliance"],
        "EMP regulatory requirements",
    ),
];

pub fn component(key: &str) -> Option<&'static ComponentInfo> {
    COMPONENTS.iter().find(|c| c.key == key)
}
