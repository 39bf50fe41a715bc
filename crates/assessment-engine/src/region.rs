//! Regional context for assessments
//!
//! Locations are free text. A project is assessed against UAE tables when
//! its location names a UAE emirate, otherwise against KSA tables. City
//! keys select city-level rows such as seismic zones.

use serde::{Deserialize, Serialize};

use crate::patterns::UAE_KEYWORDS;

/// Regulatory region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Uae,
    Ksa,
}

impl Region {
    /// Resolve the region from a free-text location
    pub fn from_location(location: &str) -> Self {
        let location = location.to_lowercase();
        if UAE_KEYWORDS.iter().any(|k| location.contains(k)) {
            Region::Uae
        } else {
            Region::Ksa
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Region::Uae => "uae",
            Region::Ksa => "ksa",
        }
    }

    /// Mean annual rainfall in mm
    pub fn annual_rainfall_mm(&self) -> f64 {
        match self {
            Region::Uae => 100.0,
            Region::Ksa => 80.0,
        }
    }

    /// Target share of demand met by recycled water
    pub fn water_recycling_target(&self) -> f64 {
        match self {
            Region::Uae => 0.5,
            Region::Ksa => 0.4,
        }
    }

    /// Recycling targets in percent: (construction, operational)
    pub fn waste_recycling_targets(&self) -> (f64, f64) {
        match self {
            Region::Uae => (65.0, 30.0),
            Region::Ksa => (45.0, 15.0),
        }
    }

    /// Gate fees per ton at the region's licensed disposal facilities
    pub fn disposal_gate_fees(&self) -> &'static [f64] {
        match self {
            // Bee'ah WtE, Emirates Environmental, DULSCO
            Region::Uae => &[120.0, 150.0, 80.0],
            // Madinah WtE, Riyadh landfill
            Region::Ksa => &[100.0, 70.0],
        }
    }

    pub fn average_disposal_fee(&self) -> f64 {
        let fees = self.disposal_gate_fees();
        fees.iter().sum::<f64>() / fees.len() as f64
    }
}

/// City resolved from a location string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Dubai,
    AbuDhabi,
    Sharjah,
    Riyadh,
    Jeddah,
    Other,
}

impl City {
    pub fn from_location(location: &str) -> Self {
        let location = location.to_lowercase();
        if location.contains("dubai") {
            City::Dubai
        } else if location.contains("abu dhabi") {
            City::AbuDhabi
        } else if location.contains("sharjah") {
            City::Sharjah
        } else if location.contains("riyadh") {
            City::Riyadh
        } else if location.contains("jeddah") {
            City::Jeddah
        } else {
            City::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_uae_cities() {
        assert_eq!(Region::from_location("Dubai Marina"), Region::Uae);
        assert_eq!(Region::from_location("ABU DHABI"), Region::Uae);
        assert_eq!(Region::from_location("Sharjah industrial area"), Region::Uae);
    }

    #[test]
    fn test_region_defaults_to_ksa() {
        assert_eq!(Region::from_location("Riyadh"), Region::Ksa);
        assert_eq!(Region::from_location("Al Ain"), Region::Ksa);
        assert_eq!(Region::from_location(""), Region::Ksa);
    }

    #[test]
    fn test_city_resolution() {
        assert_eq!(City::from_location("Downtown Dubai"), City::Dubai);
        assert_eq!(City::from_location("Abu Dhabi Corniche"), City::AbuDhabi);
        assert_eq!(City::from_location("Jeddah waterfront"), City::Jeddah);
        assert_eq!(City::from_location("Tabuk"), City::Other);
    }

    #[test]
    fn test_average_disposal_fee() {
        assert!((Region::Uae.average_disposal_fee() - 116.666_666).abs() < 1e-3);
        assert_eq!(Region::Ksa.average_disposal_fee(), 85.0);
    }
}
