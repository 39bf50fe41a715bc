//! Habitat, species and ecosystem-service screening
//!
//! The site's habitat mix is inferred from its location. Regional species
//! whose preferred habitats occur on site are scored for impact, and the
//! ecosystem services lost with the cleared habitat are valued over twenty
//! years.

use std::collections::HashMap;

use eia_types::{ComplianceStatus, ModuleReport, ModuleResult, ProjectRecord, ProjectType};
use lazy_static::lazy_static;
use serde::Serialize;

use super::{round_to, Calculator};
use crate::error::CalculatorError;
use crate::patterns::{contains_any, COASTAL_KEYWORDS, DESERT_KEYWORDS, URBAN_CITY_KEYWORDS};
use crate::region::Region;

/// Discount rate for ecosystem service NPV
const DISCOUNT_RATE: f64 = 0.03;
const NPV_YEARS: i32 = 20;

/// Cost of each offset action (land acquisition)
const OFFSET_ACTION_COST: f64 = 100_000.0;
const OFFSET_ACTIONS: f64 = 3.0;

/// Urban centres where natural habitats are degraded
const URBAN_CENTRES: &[&str] = &["dubai", "abu dhabi", "sharjah", "riyadh", "jeddah"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Habitat {
    Desert,
    Coastal,
    Marine,
    Mangrove,
    Sabkha,
    Wadi,
    Oasis,
    UrbanGreen,
    Agricultural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ConservationPriority {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
    Critical,
}

impl ConservationPriority {
    pub fn score(&self) -> u8 {
        match self {
            ConservationPriority::Critical => 5,
            ConservationPriority::VeryHigh => 4,
            ConservationPriority::High => 3,
            ConservationPriority::Moderate => 2,
            ConservationPriority::Low => 1,
        }
    }
}

/// Reference characteristics of a habitat type
#[derive(Debug, Clone, Copy)]
pub struct HabitatProfile {
    pub flora_species: u32,
    pub fauna_species: u32,
    pub priority: ConservationPriority,
}

/// IUCN Red List category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IucnStatus {
    CriticallyEndangered,
    Endangered,
    Vulnerable,
    NearThreatened,
    LeastConcern,
}

impl IucnStatus {
    fn weight(&self) -> f64 {
        match self {
            IucnStatus::CriticallyEndangered => 5.0,
            IucnStatus::Endangered => 4.0,
            IucnStatus::Vulnerable => 3.0,
            IucnStatus::NearThreatened => 2.0,
            IucnStatus::LeastConcern => 1.0,
        }
    }

    fn is_threatened(&self) -> bool {
        matches!(
            self,
            IucnStatus::CriticallyEndangered | IucnStatus::Endangered
        )
    }
}

#[derive(Debug, Clone)]
pub struct Species {
    pub id: &'static str,
    pub common_name: &'static str,
    pub scientific_name: &'static str,
    pub status: IucnStatus,
    pub habitats: &'static [Habitat],
    pub endemic: bool,
    pub protected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ImpactMagnitude {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ImpactMagnitude {
    pub fn from_score(score: f64) -> Self {
        if score >= 15.0 {
            ImpactMagnitude::VeryHigh
        } else if score >= 10.0 {
            ImpactMagnitude::High
        } else if score >= 6.0 {
            ImpactMagnitude::Moderate
        } else if score >= 3.0 {
            ImpactMagnitude::Low
        } else {
            ImpactMagnitude::VeryLow
        }
    }

    fn is_high(&self) -> bool {
        *self >= ImpactMagnitude::High
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MitigationPriority {
    Critical,
    High,
    Medium,
    Low,
}

macro_rules! species {
    ($id:literal, $common:literal, $scientific:literal, $status:ident, [$($habitat:ident),+], $endemic:literal, $protected:literal) => {
        Species {
            id: $id,
            common_name: $common,
            scientific_name: $scientific,
            status: IucnStatus::$status,
            habitats: &[$(Habitat::$habitat),+],
            endemic: $endemic,
            protected: $protected,
        }
    };
}

lazy_static! {
    static ref HABITAT_PROFILES: HashMap<Habitat, HabitatProfile> = {
        use ConservationPriority::*;
        let mut m = HashMap::new();
        m.insert(Habitat::Desert, HabitatProfile { flora_species: 15, fauna_species: 25, priority: High });
        m.insert(Habitat::Coastal, HabitatProfile { flora_species: 20, fauna_species: 45, priority: VeryHigh });
        m.insert(Habitat::Mangrove, HabitatProfile { flora_species: 8, fauna_species: 35, priority: Critical });
        m.insert(Habitat::Wadi, HabitatProfile { flora_species: 25, fauna_species: 30, priority: High });
        m.insert(Habitat::Sabkha, HabitatProfile { flora_species: 10, fauna_species: 20, priority: Moderate });
        m.insert(Habitat::UrbanGreen, HabitatProfile { flora_species: 12, fauna_species: 18, priority: Low });
        m.insert(Habitat::Agricultural, HabitatProfile { flora_species: 10, fauna_species: 15, priority: Low });
        m
    };

    /// Flora then fauna, per region
    static ref REGIONAL_SPECIES: HashMap<Region, Vec<Species>> = {
        let mut m = HashMap::new();
        m.insert(Region::Uae, vec![
            species!("ghaf_tree", "Ghaf Tree", "Prosopis cineraria", NearThreatened, [Desert, Wadi], false, true),
            species!("date_palm", "Date Palm", "Phoenix dactylifera", LeastConcern, [Oasis, Agricultural], false, false),
            species!("mangrove", "Grey Mangrove", "Avicennia marina", NearThreatened, [Mangrove, Coastal], false, true),
            species!("desert_hyacinth", "Desert Hyacinth", "Cistanche tubulosa", Vulnerable, [Desert], true, true),
            species!("arabian_oryx", "Arabian Oryx", "Oryx leucoryx", Vulnerable, [Desert], true, true),
            species!("houbara_bustard", "Houbara Bustard", "Chlamydotis undulata", Vulnerable, [Desert], false, true),
            species!("hawksbill_turtle", "Hawksbill Turtle", "Eretmochelys imbricata", CriticallyEndangered, [Marine, Coastal], false, true),
            species!("greater_flamingo", "Greater Flamingo", "Phoenicopterus roseus", LeastConcern, [Coastal, Sabkha], false, true),
            species!("arabian_leopard", "Arabian Leopard", "Panthera pardus nimr", CriticallyEndangered, [Desert], true, true),
        ]);
        m.insert(Region::Ksa, vec![
            species!("juniper_tree", "African Juniper", "Juniperus procera", NearThreatened, [Desert], false, true),
            species!("acacia_tree", "Umbrella Acacia", "Acacia tortilis", LeastConcern, [Desert, Wadi], false, false),
            species!("wild_olive", "Wild Olive", "Olea europaea subsp. cuspidata", Vulnerable, [Desert], false, true),
            species!("sand_cat", "Sand Cat", "Felis margarita", NearThreatened, [Desert], false, true),
            species!("nubian_ibex", "Nubian Ibex", "Capra nubiana", Vulnerable, [Desert], false, true),
            species!("arabian_oryx", "Arabian Oryx", "Oryx leucoryx", Vulnerable, [Desert], true, true),
        ]);
        m
    };
}

pub fn habitat_profile(habitat: Habitat) -> Option<&'static HabitatProfile> {
    HABITAT_PROFILES.get(&habitat)
}

pub fn regional_species(region: Region) -> &'static [Species] {
    REGIONAL_SPECIES
        .get(&region)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Habitat mix in percent of site area
pub fn habitat_mix(location: &str, latitude: f64) -> Vec<(Habitat, f64)> {
    use Habitat::*;

    let location = location.to_lowercase();
    if contains_any(&location, COASTAL_KEYWORDS) {
        vec![(Coastal, 60.0), (Desert, 30.0), (UrbanGreen, 10.0)]
    } else if location.contains("mangrove") || (latitude < 25.5 && location.contains("abu dhabi")) {
        vec![(Mangrove, 40.0), (Coastal, 35.0), (Sabkha, 25.0)]
    } else if contains_any(&location, DESERT_KEYWORDS) {
        vec![(Desert, 80.0), (Wadi, 15.0), (UrbanGreen, 5.0)]
    } else if contains_any(&location, URBAN_CITY_KEYWORDS) {
        vec![(UrbanGreen, 50.0), (Desert, 40.0), (Agricultural, 10.0)]
    } else {
        vec![(Desert, 70.0), (Wadi, 20.0), (UrbanGreen, 10.0)]
    }
}

/// Condition class of a habitat under local human pressure
pub fn habitat_condition(habitat: Habitat, location: &str) -> &'static str {
    let location = location.to_lowercase();
    if contains_any(&location, URBAN_CENTRES) {
        match habitat {
            Habitat::UrbanGreen | Habitat::Agricultural => "Fair",
            _ => "Poor",
        }
    } else {
        match habitat {
            Habitat::Mangrove | Habitat::Coastal => "Good",
            _ => "Fair",
        }
    }
}

fn project_factor(project_type: ProjectType) -> f64 {
    match project_type {
        ProjectType::Industrial => 3.0,
        ProjectType::Infrastructure => 2.5,
        ProjectType::Commercial => 2.0,
        ProjectType::Residential => 1.5,
        ProjectType::MixedUse => 1.8,
        _ => 2.0,
    }
}

pub fn species_impact(species: &Species, habitat_pct: f64, project_type: ProjectType) -> ImpactMagnitude {
    let area_factor = (habitat_pct / 100.0 * 3.0).min(3.0);
    let mut protection = if species.endemic { 1.5 } else { 1.0 };
    if species.protected {
        protection *= 1.3;
    }
    let score = species.status.weight() * area_factor * protection * project_factor(project_type);
    ImpactMagnitude::from_score(score)
}

pub fn mitigation_priority(species: &Species, magnitude: ImpactMagnitude) -> MitigationPriority {
    if species.status.is_threatened() || (species.endemic && magnitude.is_high()) {
        MitigationPriority::Critical
    } else if magnitude.is_high() {
        MitigationPriority::High
    } else if magnitude == ImpactMagnitude::Moderate {
        MitigationPriority::Medium
    } else {
        MitigationPriority::Low
    }
}

/// A species whose habitat occurs on site
#[derive(Debug, Clone)]
pub struct AffectedSpecies {
    pub species: &'static Species,
    pub habitat: Habitat,
    pub magnitude: ImpactMagnitude,
    pub priority: MitigationPriority,
}

impl AffectedSpecies {
    pub fn is_critical(&self) -> bool {
        self.species.status.is_threatened()
            || self.species.endemic
            || self.priority == MitigationPriority::Critical
    }
}

/// Affected species, one entry per species id. A species found in
/// several site habitats keeps its first position and is scored against
/// the last habitat matched.
pub fn affected_species(
    region: Region,
    mix: &[(Habitat, f64)],
    project_type: ProjectType,
) -> Vec<AffectedSpecies> {
    let mut affected: Vec<AffectedSpecies> = Vec::new();
    for &(habitat, pct) in mix {
        for species in regional_species(region) {
            if !species.habitats.contains(&habitat) {
                continue;
            }
            let magnitude = species_impact(species, pct, project_type);
            let entry = AffectedSpecies {
                species,
                habitat,
                magnitude,
                priority: mitigation_priority(species, magnitude),
            };
            match affected.iter_mut().find(|a| a.species.id == species.id) {
                Some(existing) => *existing = entry,
                None => affected.push(entry),
            }
        }
    }
    affected
}

/// Ecosystem services valued per hectare per year (USD)
fn ecosystem_services(habitat: Habitat) -> &'static [(&'static str, f64)] {
    const CARBON: (&str, f64) = ("carbon_sequestration", 150.0);
    const COASTAL: (&str, f64) = ("coastal_protection", 2500.0);
    const TOURISM: (&str, f64) = ("tourism_recreation", 800.0);
    const BIODIVERSITY: (&str, f64) = ("biodiversity_habitat", 300.0);
    const WATER: (&str, f64) = ("water_regulation", 600.0);
    const CULTURAL: (&str, f64) = ("cultural_heritage", 200.0);

    match habitat {
        Habitat::Mangrove => &[COASTAL, CARBON, BIODIVERSITY],
        Habitat::Coastal => &[COASTAL, TOURISM, BIODIVERSITY],
        Habitat::Desert => &[CARBON, CULTURAL, BIODIVERSITY],
        Habitat::Wadi => &[WATER, BIODIVERSITY, CULTURAL],
        _ => &[BIODIVERSITY, CULTURAL],
    }
}

pub fn npv_factor() -> f64 {
    (1..=NPV_YEARS)
        .map(|year| 1.0 / (1.0 + DISCOUNT_RATE).powi(year))
        .sum()
}

/// Habitat present on site with its area
#[derive(Debug, Clone)]
struct SiteHabitat {
    habitat: Habitat,
    hectares: f64,
    profile: &'static HabitatProfile,
}

#[derive(Debug, Serialize)]
struct BiologicalDetails {
    habitat_types: usize,
    conservation_value: f64,
    species_affected: usize,
    critical_species: usize,
    ecosystem_service_loss_usd: f64,
    mitigation_cost: f64,
}

pub struct BiologicalCalculator;

impl Calculator for BiologicalCalculator {
    fn evaluate(&self, project: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
        let region = Region::from_location(&project.location);
        let mix = habitat_mix(&project.location, project.latitude);
        let site_hectares = project.size / 10_000.0;

        let mut habitats = Vec::with_capacity(mix.len());
        let mut conservation = 0.0;
        for &(habitat, pct) in &mix {
            let profile = habitat_profile(habitat).ok_or_else(|| {
                CalculatorError::MissingReferenceData(format!("habitat profile for {:?}", habitat))
            })?;
            conservation += f64::from(profile.priority.score()) * pct;
            tracing::trace!(
                habitat = ?habitat,
                condition = habitat_condition(habitat, &project.location),
                "site habitat"
            );
            habitats.push(SiteHabitat {
                habitat,
                hectares: round_to(site_hectares * pct / 100.0, 2),
                profile,
            });
        }

        let species = affected_species(region, &mix, project.project_type);
        let critical = species.iter().filter(|s| s.is_critical()).count();

        let annual_loss: f64 = habitats
            .iter()
            .map(|h| {
                ecosystem_services(h.habitat)
                    .iter()
                    .map(|(_, value)| h.hectares * value)
                    .sum::<f64>()
            })
            .sum();

        let total_hectares: f64 = habitats.iter().map(|h| h.hectares).sum();
        let has_high_value_habitat = habitats.iter().any(|h| h.profile.priority.score() >= 4);
        let offsets = if has_high_value_habitat {
            OFFSET_ACTIONS * OFFSET_ACTION_COST
        } else {
            0.0
        };
        // surveys, avoidance, restoration, monitoring, offsets
        let mitigation_cost = 50_000.0 + 25_000.0 + total_hectares * 15_000.0 + 30_000.0 + offsets;

        let details = BiologicalDetails {
            habitat_types: habitats.len(),
            conservation_value: round_to(conservation / 100.0, 1),
            species_affected: species.len(),
            critical_species: critical,
            ecosystem_service_loss_usd: round_to(annual_loss * npv_factor(), 0),
            mitigation_cost: round_to(mitigation_cost, 0),
        };

        let compliance = if critical == 0 {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::MitigationRequired
        };

        let mut report = ModuleReport::from_details(&details, Some(compliance))?;
        if critical > 0 {
            report = report.with_issue(format!("{} critical species affected", critical));
        }

        Ok(ModuleResult::Assessed(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(location: &str, project_type: ProjectType) -> ProjectRecord {
        ProjectRecord::new("p1", "Test", project_type, location, 10_000.0)
    }

    #[test]
    fn test_habitat_mix_keywords() {
        assert_eq!(habitat_mix("Dubai Marina", 25.0)[0].0, Habitat::Coastal);
        assert_eq!(habitat_mix("Mangrove bay", 26.0)[0].0, Habitat::Mangrove);
        assert_eq!(habitat_mix("Al Ain", 24.2)[0], (Habitat::Desert, 80.0));
        assert_eq!(habitat_mix("Riyadh", 24.7)[0], (Habitat::UrbanGreen, 50.0));
        assert_eq!(habitat_mix("Tabuk", 28.4)[0], (Habitat::Desert, 70.0));
    }

    #[test]
    fn test_southern_abu_dhabi_is_mangrove() {
        assert_eq!(habitat_mix("Abu Dhabi", 24.45)[0].0, Habitat::Mangrove);
        assert_eq!(habitat_mix("Abu Dhabi", 25.6)[0].0, Habitat::Desert);
    }

    #[test]
    fn test_every_site_habitat_has_a_profile() {
        for location in ["marina", "mangrove", "desert", "dubai", "elsewhere"] {
            for (habitat, _) in habitat_mix(location, 30.0) {
                assert!(habitat_profile(habitat).is_some(), "{:?}", habitat);
            }
        }
    }

    #[test]
    fn test_habitat_condition_under_urban_pressure() {
        assert_eq!(habitat_condition(Habitat::UrbanGreen, "Dubai"), "Fair");
        assert_eq!(habitat_condition(Habitat::Desert, "Dubai"), "Poor");
        assert_eq!(habitat_condition(Habitat::Coastal, "Fujairah coast"), "Good");
        assert_eq!(habitat_condition(Habitat::Wadi, "Tabuk"), "Fair");
    }

    #[test]
    fn test_leopard_is_critical_regardless_of_magnitude() {
        let leopard = regional_species(Region::Uae)
            .iter()
            .find(|s| s.id == "arabian_leopard")
            .unwrap();
        let magnitude = species_impact(leopard, 5.0, ProjectType::Residential);
        assert_eq!(mitigation_priority(leopard, magnitude), MitigationPriority::Critical);
    }

    #[test]
    fn test_impact_magnitude_thresholds() {
        assert_eq!(ImpactMagnitude::from_score(15.0), ImpactMagnitude::VeryHigh);
        assert_eq!(ImpactMagnitude::from_score(9.9), ImpactMagnitude::Moderate);
        assert_eq!(ImpactMagnitude::from_score(2.9), ImpactMagnitude::VeryLow);
    }

    #[test]
    fn test_species_deduplicated_across_habitats() {
        // Ghaf prefers desert and wadi, both present in the default mix
        let mix = habitat_mix("Tabuk", 28.0);
        let species = affected_species(Region::Uae, &mix, ProjectType::Residential);
        let ghaf: Vec<_> = species.iter().filter(|s| s.species.id == "ghaf_tree").collect();
        assert_eq!(ghaf.len(), 1);
        assert_eq!(ghaf[0].habitat, Habitat::Wadi);
    }

    #[test]
    fn test_npv_factor() {
        assert!((npv_factor() - 14.8775).abs() < 1e-3);
    }

    #[test]
    fn test_dubai_residential_requires_mitigation() {
        let result = BiologicalCalculator
            .evaluate(&project("Dubai", ProjectType::Residential))
            .unwrap();
        let report = result.report().unwrap();

        assert_eq!(report.compliance, Some(ComplianceStatus::MitigationRequired));
        assert_eq!(report.detail("habitat_types").unwrap(), 3);
        assert_eq!(report.detail_f64("conservation_value"), Some(1.8));
        // hyacinth, oryx, leopard
        assert_eq!(report.detail("critical_species").unwrap(), 3);
        assert_eq!(report.detail_f64("mitigation_cost"), Some(120_000.0));
        assert_eq!(report.critical_issues, vec!["3 critical species affected".to_string()]);
    }

    #[test]
    fn test_coastal_site_includes_offsets() {
        let result = BiologicalCalculator
            .evaluate(&project("Jumeirah coastal strip", ProjectType::Tourism))
            .unwrap();
        let report = result.report().unwrap();
        // 1 ha restored plus three offset actions
        assert_eq!(report.detail_f64("mitigation_cost"), Some(420_000.0));
    }
}
