//! Location keyword tables used to classify free-text project locations

/// Locations assessed against UAE tables
pub const UAE_KEYWORDS: &[&str] = &["dubai", "abu dhabi", "sharjah"];

/// Coastal settings (habitats, geology)
pub const COASTAL_KEYWORDS: &[&str] = &["coastal", "marina"];

/// Coastal geology additionally recognizes beaches
pub const SHORELINE_KEYWORDS: &[&str] = &["coastal", "marina", "beach"];

/// Mountain and foothill settings
pub const MOUNTAIN_KEYWORDS: &[&str] = &["mountain", "hill", "jebel"];

/// Salt flat settings
pub const SABKHA_KEYWORDS: &[&str] = &["sabkha", "salt"];

/// Open desert settings
pub const DESERT_KEYWORDS: &[&str] = &["desert", "al ain"];

/// Major cities whose sites are mostly urban green space
pub const URBAN_CITY_KEYWORDS: &[&str] = &["dubai", "sharjah", "riyadh", "jeddah"];

/// Former land uses with a high contamination likelihood
pub const HIGH_CONTAMINATION_KEYWORDS: &[&str] = &["industrial", "port", "airport"];

/// Former land uses with a moderate contamination likelihood
pub const MODERATE_CONTAMINATION_KEYWORDS: &[&str] = &["gas station", "petrol", "fuel"];

/// Locations that raise the severity of environmental risks
pub const SENSITIVE_KEYWORDS: &[&str] = &["protected", "reserve", "coastal"];

/// Dense urban locations
pub const URBAN_KEYWORDS: &[&str] = &["urban", "city", "downtown"];

/// Locations exposed to climate hazards (heat, sea level)
pub const CLIMATE_EXPOSED_KEYWORDS: &[&str] = &["coastal", "dubai", "abu dhabi"];

/// True when `location` (already lower-cased) contains any keyword
pub fn contains_any(location: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| location.contains(k))
}
