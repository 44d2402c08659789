//! Derived metrics over site records.
//!
//! Pure functions only: every figure the monitor displays or stores is
//! recomputed from the current site snapshot, nothing here caches state.

use serde::{Deserialize, Serialize};

use crate::api::Site;

/// Qualitative band for an estimated-damage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageLabel {
    Severe,
    High,
    Moderate,
    Low,
}

impl std::fmt::Display for DamageLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DamageLabel::Severe => "Severe",
            DamageLabel::High => "High",
            DamageLabel::Moderate => "Moderate",
            DamageLabel::Low => "Low",
        };
        write!(f, "{}", s)
    }
}

/// Estimated environmental damage for one site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEstimate {
    pub score: f64,
    pub label: DamageLabel,
}

/// Qualitative band for an environmental-impact score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLevel {
    Critical,
    High,
    Moderate,
    Low,
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ImpactLevel::Critical => "Critical",
            ImpactLevel::High => "High",
            ImpactLevel::Moderate => "Moderate",
            ImpactLevel::Low => "Low",
        };
        write!(f, "{}", s)
    }
}

/// Per-dimension contributions to an impact score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactFactors {
    pub area: f64,
    pub depth: f64,
    pub volume: f64,
}

/// Environmental impact assessment for one site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub score: f64,
    pub level: ImpactLevel,
    pub factors: ImpactFactors,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Total surface area across all sites, in hectares.
pub fn total_area(sites: &[Site]) -> f64 {
    sites.iter().map(|s| s.area_ha).sum()
}

/// Mean surface area, 0 for an empty snapshot.
pub fn average_area(sites: &[Site]) -> f64 {
    if sites.is_empty() {
        return 0.0;
    }
    total_area(sites) / sites.len() as f64
}

/// Number of sites with `Active` status.
pub fn active_count(sites: &[Site]) -> usize {
    sites.iter().filter(|s| s.is_active()).count()
}

/// Number of sites flagged as illegal.
pub fn violation_count(sites: &[Site]) -> usize {
    sites.iter().filter(|s| s.illegal).count()
}

/// Damage score from footprint and extracted volume.
///
/// score = area × 1.5 + volume × 2.0, banded with strict comparisons:
/// a score of exactly 15 is High, not Severe.
pub fn damage_estimate(area_ha: f64, volume_mcm: f64) -> DamageEstimate {
    let score = area_ha * 1.5 + volume_mcm * 2.0;
    let label = if score > 15.0 {
        DamageLabel::Severe
    } else if score > 8.0 {
        DamageLabel::High
    } else if score > 4.0 {
        DamageLabel::Moderate
    } else {
        DamageLabel::Low
    };
    DamageEstimate { score, label }
}

/// Enforcement priority on a 5 to 10 scale.
///
/// Starts at 5, adds up to 2 for footprint, up to 2 for volume, 1 for
/// loose materials (Sand/Stone), and caps at 10. Non-decreasing in both
/// area and volume.
pub fn priority_score(site: &Site) -> u8 {
    let mut priority: u8 = 5;

    if site.area_ha > 5.0 {
        priority += 2;
    } else if site.area_ha > 2.0 {
        priority += 1;
    }

    if site.volume_mcm > 1.0 {
        priority += 2;
    } else if site.volume_mcm > 0.5 {
        priority += 1;
    }

    if site.material == "Sand" || site.material == "Stone" {
        priority += 1;
    }

    priority.min(10)
}

/// Environmental impact from area, depth and volume.
///
/// The band is chosen from the unrounded score; the surfaced score and
/// factors are rounded to 2 decimals.
pub fn environmental_impact(site: &Site) -> EnvironmentalImpact {
    let area_factor = site.area_ha * 0.3;
    let depth_factor = site.depth_m * 0.02;
    let volume_factor = site.volume_mcm * 0.5;
    let score = area_factor + depth_factor + volume_factor;

    let level = if score > 10.0 {
        ImpactLevel::Critical
    } else if score > 6.0 {
        ImpactLevel::High
    } else if score > 3.0 {
        ImpactLevel::Moderate
    } else {
        ImpactLevel::Low
    };

    EnvironmentalImpact {
        score: round2(score),
        level,
        factors: ImpactFactors {
            area: round2(area_factor),
            depth: round2(depth_factor),
            volume: round2(volume_factor),
        },
    }
}

/// Heat-map intensity in [0, 1].
///
/// 40% footprint (saturating at 20 ha), 40% volume (saturating at
/// 6 mcm), 20% activity. Only feeds the five-band heat color lookup.
pub fn heat_intensity(site: &Site) -> f64 {
    let area_term = (site.area_ha / 20.0).min(1.0);
    let volume_term = (site.volume_mcm / 6.0).min(1.0);
    let activity_term = if site.is_active() { 1.0 } else { 0.5 };
    0.4 * area_term + 0.4 * volume_term + 0.2 * activity_term
}
