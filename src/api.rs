//! Public API surface for the mining monitor.
//!
//! This file consolidates the core domain types and re-exports the
//! analysis payload types so callers import from a single place.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::analysis::engine::DetectionSensitivity;
pub use crate::analysis::metrics::DamageEstimate;
pub use crate::analysis::metrics::DamageLabel;
pub use crate::analysis::metrics::EnvironmentalImpact;
pub use crate::analysis::metrics::ImpactFactors;
pub use crate::analysis::metrics::ImpactLevel;
pub use crate::analysis::results::AnalysisKind;
pub use crate::analysis::results::AnalysisRecord;
pub use crate::analysis::results::AnalysisPayload;
pub use crate::analysis::results::BatchEntry;
pub use crate::analysis::results::BatchImpact;
pub use crate::analysis::results::ChangeReport;
pub use crate::analysis::results::DetectionSummary;
pub use crate::analysis::results::Trend;
pub use crate::analysis::results::ViolationItem;
pub use crate::analysis::results::ViolationReport;
pub use crate::analysis::results::VolumeEstimate;
pub use crate::analysis::spatial::SpatialSummary;
pub use crate::export::ExportFormat;
pub use crate::monitor::StatsSnapshot;
pub use crate::overlay::BoundaryRect;
pub use crate::overlay::HeatPoint;
pub use crate::ui::Severity;

use serde::{Deserialize, Serialize};

/// Mining site identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SiteId(pub i64);

impl SiteId {
    pub fn new(value: i64) -> Self {
        SiteId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Zero-padded form used by the site info panel, e.g. `#00004`.
    pub fn padded(&self) -> String {
        format!("#{:05}", self.0)
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SiteId> for i64 {
    fn from(id: SiteId) -> Self {
        id.0
    }
}

impl From<i64> for SiteId {
    fn from(value: i64) -> Self {
        SiteId(value)
    }
}

/// A point on the map in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err("Latitude must be between -90 and 90 degrees".to_string());
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err("Longitude must be between -180 and 180 degrees".to_string());
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Display form used throughout reports, e.g. `23.7957°N, 86.4304°E`.
    pub fn display(&self) -> String {
        format!("{:.4}°N, {:.4}°E", self.latitude, self.longitude)
    }
}

/// Operational status of a mining site.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    Active,
    Inactive,
    Illegal,
}

impl SiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteStatus::Active => "active",
            SiteStatus::Inactive => "inactive",
            SiteStatus::Illegal => "illegal",
        }
    }
}

impl std::fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SiteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SiteStatus::Active),
            "inactive" => Ok(SiteStatus::Inactive),
            "illegal" => Ok(SiteStatus::Illegal),
            other => Err(format!("Unknown site status: {}", other)),
        }
    }
}

/// A monitored mining site.
///
/// `status` and `illegal` are independent fields: the bundled data keeps
/// them consistent, but consumers must not assume one implies the other.
/// Violation counting keys on the `illegal` flag, map styling on `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    /// Representative center point of the site.
    pub location: GeoPoint,
    pub status: SiteStatus,
    /// Surface area in hectares.
    pub area_ha: f64,
    /// Maximum excavation depth in meters.
    pub depth_m: f64,
    /// Extracted volume in million cubic meters.
    pub volume_mcm: f64,
    /// Extracted material, e.g. "Coal" or "Iron Ore".
    pub material: String,
    pub operator: String,
    pub illegal: bool,
    /// Boundary polygon vertices (at least 3).
    pub boundary: Vec<GeoPoint>,
}

impl Site {
    /// Checks the structural invariants of a site record.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Site name must not be empty".to_string());
        }
        if !self.area_ha.is_finite() || self.area_ha < 0.0 {
            return Err(format!(
                "Site '{}' has invalid area: {}",
                self.name, self.area_ha
            ));
        }
        if !self.depth_m.is_finite() || self.depth_m < 0.0 {
            return Err(format!(
                "Site '{}' has invalid depth: {}",
                self.name, self.depth_m
            ));
        }
        if !self.volume_mcm.is_finite() || self.volume_mcm < 0.0 {
            return Err(format!(
                "Site '{}' has invalid volume: {}",
                self.name, self.volume_mcm
            ));
        }
        if self.boundary.len() < 3 {
            return Err(format!(
                "Site '{}' boundary needs at least 3 vertices, got {}",
                self.name,
                self.boundary.len()
            ));
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == SiteStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_site() -> Site {
        Site {
            id: SiteId::new(1),
            name: "Test Mine".to_string(),
            location: GeoPoint {
                latitude: 20.0,
                longitude: 78.0,
            },
            status: SiteStatus::Active,
            area_ha: 5.0,
            depth_m: 30.0,
            volume_mcm: 1.0,
            material: "Coal".to_string(),
            operator: "Test Co".to_string(),
            illegal: false,
            boundary: vec![
                GeoPoint {
                    latitude: 19.999,
                    longitude: 77.999,
                },
                GeoPoint {
                    latitude: 20.001,
                    longitude: 78.0,
                },
                GeoPoint {
                    latitude: 20.0,
                    longitude: 78.001,
                },
            ],
        }
    }

    #[test]
    fn test_site_id_padded() {
        assert_eq!(SiteId::new(4).padded(), "#00004");
        assert_eq!(SiteId::new(12345).padded(), "#12345");
    }

    #[test]
    fn test_geo_point_rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(-91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 181.0).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(23.7957, 86.4304).is_ok());
    }

    #[test]
    fn test_geo_point_display() {
        let p = GeoPoint {
            latitude: 23.7957,
            longitude: 86.4304,
        };
        assert_eq!(p.display(), "23.7957°N, 86.4304°E");
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["active", "inactive", "illegal"] {
            let parsed: SiteStatus = s.parse().unwrap();
            assert_eq!(parsed.to_string(), s);
        }
        assert!("abandoned".parse::<SiteStatus>().is_err());
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&SiteStatus::Illegal).unwrap();
        assert_eq!(json, r#""illegal""#);
        let back: SiteStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SiteStatus::Illegal);
    }

    #[test]
    fn test_validate_accepts_well_formed_site() {
        assert!(sample_site().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_records() {
        let mut s = sample_site();
        s.name = "  ".to_string();
        assert!(s.validate().is_err());

        let mut s = sample_site();
        s.area_ha = -1.0;
        assert!(s.validate().is_err());

        let mut s = sample_site();
        s.boundary.truncate(2);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_illegal_flag_independent_of_status() {
        let mut s = sample_site();
        s.status = SiteStatus::Illegal;
        s.illegal = false;
        assert!(s.validate().is_ok());
    }
}
