// Workforce, population, traffic, heritage and community screening
use eia_types::{ComplianceStatus, ModuleReport, ModuleResult, ProjectRecord, ProjectType};
use serde::Serialize;

use super::{occupancy, Calculator};
use crate::error::CalculatorError;
use crate::region::Region;

/// Assumed distance from the project to a heritage site in the same locality
pub const ASSUMED_SITE_DISTANCE_M: f64 = 800.0;

const MIN_CONSTRUCTION_WORKERS: u64 = 50;
const MIN_RESIDENT_POPULATION: u64 = 20;
const ENGAGEMENT_COST_PER_YEAR: f64 = 50_000.0;

/// A registered cultural heritage site
#[derive(Debug, Clone, Serialize)]
pub struct HeritageSite {
    pub name: &'static str,
    pub locality: &'static str,
    pub significance: &'static str,
    pub buffer_zone_m: f64,
}

const UAE_HERITAGE: &[HeritageSite] = &[
    HeritageSite { name: "Al Fahidi Historical Neighbourhood", locality: "Dubai", significance: "National", buffer_zone_m: 500.0 },
    HeritageSite { name: "Sheikh Saeed Al Maktoum House", locality: "Dubai", significance: "National", buffer_zone_m: 200.0 },
    HeritageSite { name: "Qasr Al Hosn", locality: "Abu Dhabi", significance: "National", buffer_zone_m: 1000.0 },
    HeritageSite { name: "Heritage Village", locality: "Abu Dhabi", significance: "Regional", buffer_zone_m: 300.0 },
];

const KSA_HERITAGE: &[HeritageSite] = &[
    HeritageSite { name: "Al-Turaif District", locality: "Diriyah, Riyadh", significance: "UNESCO World Heritage", buffer_zone_m: 2000.0 },
    HeritageSite { name: "Historic Jeddah", locality: "Jeddah", significance: "UNESCO World Heritage", buffer_zone_m: 1500.0 },
    HeritageSite { name: "Masjid al-Haram", locality: "Makkah", significance: "International Religious", buffer_zone_m: 5000.0 },
    HeritageSite { name: "Al-Rajhi Mosque", locality: "Riyadh", significance: "Local", buffer_zone_m: 100.0 },
];

pub fn heritage_sites(region: Region) -> &'static [HeritageSite] {
    match region {
        Region::Uae => UAE_HERITAGE,
        Region::Ksa => KSA_HERITAGE,
    }
}

impl HeritageSite {
    /// Any word of the site's locality occurs in the project location
    pub fn shares_locality(&self, location: &str) -> bool {
        let location = location.to_lowercase();
        self.locality
            .to_lowercase()
            .split_whitespace()
            .any(|word| location.contains(word))
    }

    pub fn impact_level(&self, distance_m: f64) -> &'static str {
        let level = if distance_m <= self.buffer_zone_m * 0.3 {
            "high"
        } else if distance_m <= self.buffer_zone_m * 0.6 {
            "moderate"
        } else if distance_m <= self.buffer_zone_m {
            "low"
        } else {
            "negligible"
        };

        let nationally_significant =
            matches!(self.significance, "National" | "UNESCO World Heritage");
        if nationally_significant && level == "moderate" {
            "high"
        } else {
            level
        }
    }
}

/// Construction workers on site at peak
pub fn construction_workforce(project: &ProjectRecord) -> u64 {
    let rate = match project.project_type {
        ProjectType::Residential => 0.008,
        ProjectType::Commercial => 0.012,
        ProjectType::Industrial => 0.015,
        ProjectType::Infrastructure => 0.020,
        _ => 0.010,
    };
    ((project.size * rate) as u64).max(MIN_CONSTRUCTION_WORKERS)
}

/// Daily operational vehicle trips from regional trip generation rates
pub fn daily_trips(project: &ProjectRecord, region: Region) -> u64 {
    // Residential rates are per dwelling (100 m²), the rest per 1000 m²
    let (residential, commercial, industrial, mixed) = match region {
        Region::Uae => (8.5, 85.0, 15.0, 55.0),
        Region::Ksa => (7.2, 75.0, 12.0, 45.0),
    };
    let trips = match project.project_type {
        ProjectType::Residential => project.size / 100.0 * residential,
        ProjectType::Commercial => project.size / 1000.0 * commercial,
        ProjectType::Industrial => project.size / 1000.0 * industrial,
        _ => project.size / 1000.0 * mixed,
    };
    trips as u64
}

/// Peak daily truck movements during construction
pub fn construction_truck_trips(project: &ProjectRecord) -> u64 {
    let rate = match project.project_type {
        ProjectType::Residential => 0.15,
        ProjectType::Commercial => 0.20,
        ProjectType::Industrial => 0.25,
        ProjectType::Infrastructure => 0.30,
        _ => 0.18,
    };
    (project.size * rate / 1000.0) as u64
}

/// Vulnerable residents within 1 km
pub fn vulnerable_population(size: f64) -> u64 {
    let nearby = (size * 0.1) as u64;
    (nearby as f64 * 0.45) as u64
}

#[derive(Debug, Serialize)]
struct AffectedSite {
    name: &'static str,
    significance: &'static str,
    distance_meters: f64,
    impact_level: &'static str,
}

#[derive(Debug, Serialize)]
struct SocioEconomicDetails {
    construction_workers: u64,
    population_increase: u64,
    traffic_trips_daily: u64,
    peak_hour_trips: u64,
    construction_truck_trips_daily: u64,
    heritage_sites_affected: usize,
    heritage_sites: Vec<AffectedSite>,
    vulnerable_population: u64,
    community_engagement_budget: f64,
}

pub struct SocioEconomicCalculator;

impl Calculator for SocioEconomicCalculator {
    fn evaluate(&self, project: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
        let region = Region::from_location(&project.location);

        let sites: Vec<AffectedSite> = heritage_sites(region)
            .iter()
            .filter(|site| site.shares_locality(&project.location))
            .filter(|site| ASSUMED_SITE_DISTANCE_M <= site.buffer_zone_m)
            .map(|site| AffectedSite {
                name: site.name,
                significance: site.significance,
                distance_meters: ASSUMED_SITE_DISTANCE_M,
                impact_level: site.impact_level(ASSUMED_SITE_DISTANCE_M),
            })
            .collect();
        let affected = sites.len();

        let trips = daily_trips(project, region);
        let details = SocioEconomicDetails {
            construction_workers: construction_workforce(project),
            population_increase: occupancy(project).max(MIN_RESIDENT_POPULATION),
            traffic_trips_daily: trips,
            peak_hour_trips: (trips as f64 * 0.12) as u64,
            construction_truck_trips_daily: construction_truck_trips(project),
            heritage_sites_affected: affected,
            heritage_sites: sites,
            vulnerable_population: vulnerable_population(project.size),
            community_engagement_budget: ENGAGEMENT_COST_PER_YEAR * project.duration as f64 / 12.0,
        };

        let compliance = if affected == 0 {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::HeritageAssessmentRequired
        };

        let mut report = ModuleReport::from_details(&details, Some(compliance))?;
        if affected > 0 {
            report = report.with_issue(format!("{} heritage sites potentially affected", affected));
        }

        Ok(ModuleResult::Assessed(report))
    }
}
