//! Monitor configuration file support.
//!
//! This module provides utilities for reading monitor configuration from
//! TOML configuration files. Every field has a default matching the
//! shipped demonstrator, so a missing or partial file still yields a
//! fully usable configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::analysis::engine::DetectionSensitivity;
use crate::api::SiteStatus;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),
    #[error("Failed to parse config file: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub colors: StatusPalette,
    #[serde(default)]
    pub intervals: IntervalSettings,
    #[serde(default)]
    pub latency: LatencySettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default = "default_export_formats")]
    pub export_formats: Vec<String>,
}

/// Map viewport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_center")]
    pub default_center: [f64; 2],
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
    #[serde(default = "default_site_zoom")]
    pub site_zoom: u8,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u8,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    #[serde(default = "default_opacity")]
    pub default_opacity: f64,
}

/// Border/fill color pair for one site status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorPair {
    pub border: String,
    pub fill: String,
}

/// Per-status layer colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPalette {
    #[serde(default = "default_active_colors")]
    pub active: ColorPair,
    #[serde(default = "default_inactive_colors")]
    pub inactive: ColorPair,
    #[serde(default = "default_illegal_colors")]
    pub illegal: ColorPair,
}

impl StatusPalette {
    pub fn for_status(&self, status: SiteStatus) -> &ColorPair {
        match status {
            SiteStatus::Active => &self.active,
            SiteStatus::Inactive => &self.inactive,
            SiteStatus::Illegal => &self.illegal,
        }
    }
}

/// Periodic task intervals in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalSettings {
    #[serde(default = "default_stats_update_ms")]
    pub stats_update_ms: u64,
    #[serde(default = "default_auto_save_ms")]
    pub auto_save_ms: u64,
}

/// Artificial processing delays per analysis run, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencySettings {
    #[serde(default = "default_detection_ms")]
    pub detection_ms: u64,
    #[serde(default = "default_volume_ms")]
    pub volume_ms: u64,
    #[serde(default = "default_illegal_ms")]
    pub illegal_ms: u64,
    #[serde(default = "default_batch_ms")]
    pub batch_ms: u64,
    #[serde(default = "default_export_ms")]
    pub export_ms: u64,
}

/// Analysis tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Cluster absorption radius in planar degrees.
    #[serde(default = "default_cluster_threshold")]
    pub cluster_threshold_deg: f64,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: String,
    /// Number of entries shown in the batch impact report.
    #[serde(default = "default_top_sites")]
    pub top_sites: usize,
}

fn default_center() -> [f64; 2] {
    [20.5937, 78.9629]
}

fn default_zoom() -> u8 {
    5
}

fn default_site_zoom() -> u8 {
    14
}

fn default_min_zoom() -> u8 {
    3
}

fn default_max_zoom() -> u8 {
    18
}

fn default_opacity() -> f64 {
    0.7
}

fn default_active_colors() -> ColorPair {
    ColorPair {
        border: "#4CAF50".to_string(),
        fill: "#66BB6A".to_string(),
    }
}

fn default_inactive_colors() -> ColorPair {
    ColorPair {
        border: "#9E9E9E".to_string(),
        fill: "#BDBDBD".to_string(),
    }
}

fn default_illegal_colors() -> ColorPair {
    ColorPair {
        border: "#F44336".to_string(),
        fill: "#EF5350".to_string(),
    }
}

fn default_stats_update_ms() -> u64 {
    5000
}

fn default_auto_save_ms() -> u64 {
    30000
}

fn default_detection_ms() -> u64 {
    2000
}

fn default_volume_ms() -> u64 {
    1500
}

fn default_illegal_ms() -> u64 {
    2000
}

fn default_batch_ms() -> u64 {
    2500
}

fn default_export_ms() -> u64 {
    1000
}

fn default_cluster_threshold() -> f64 {
    0.5
}

fn default_sensitivity() -> String {
    "medium".to_string()
}

fn default_top_sites() -> usize {
    5
}

fn default_export_formats() -> Vec<String> {
    vec![
        "GeoJSON".to_string(),
        "KML".to_string(),
        "Shapefile".to_string(),
        "CSV".to_string(),
        "PDF Report".to_string(),
    ]
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center: default_center(),
            default_zoom: default_zoom(),
            site_zoom: default_site_zoom(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            default_opacity: default_opacity(),
        }
    }
}

impl Default for StatusPalette {
    fn default() -> Self {
        Self {
            active: default_active_colors(),
            inactive: default_inactive_colors(),
            illegal: default_illegal_colors(),
        }
    }
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            stats_update_ms: default_stats_update_ms(),
            auto_save_ms: default_auto_save_ms(),
        }
    }
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            detection_ms: default_detection_ms(),
            volume_ms: default_volume_ms(),
            illegal_ms: default_illegal_ms(),
            batch_ms: default_batch_ms(),
            export_ms: default_export_ms(),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            cluster_threshold_deg: default_cluster_threshold(),
            sensitivity: default_sensitivity(),
            top_sites: default_top_sites(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            map: MapSettings::default(),
            colors: StatusPalette::default(),
            intervals: IntervalSettings::default(),
            latency: LatencySettings::default(),
            analysis: AnalysisSettings::default(),
            export_formats: default_export_formats(),
        }
    }
}

impl MonitorConfig {
    /// Load monitor configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(MonitorConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.as_ref().display(), e)))?;

        let config: MonitorConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load monitor configuration from the default location.
    ///
    /// Searches for `orenexus.toml` in:
    /// 1. Current directory
    /// 2. `config/` directory
    /// 3. Parent directory
    ///
    /// Falls back to the built-in defaults when no file is found.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = vec![
            PathBuf::from("orenexus.toml"),
            PathBuf::from("config/orenexus.toml"),
            PathBuf::from("../orenexus.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        log::debug!("No orenexus.toml found in standard locations, using defaults");
        Ok(Self::default())
    }

    /// Get the configured detection sensitivity.
    pub fn sensitivity(&self) -> Result<DetectionSensitivity, String> {
        DetectionSensitivity::from_str(&self.analysis.sensitivity)
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.map;
        if m.min_zoom > m.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "min_zoom ({}) exceeds max_zoom ({})",
                m.min_zoom, m.max_zoom
            )));
        }
        if m.default_zoom < m.min_zoom || m.default_zoom > m.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "default_zoom ({}) outside [{}, {}]",
                m.default_zoom, m.min_zoom, m.max_zoom
            )));
        }
        if m.site_zoom < m.min_zoom || m.site_zoom > m.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "site_zoom ({}) outside [{}, {}]",
                m.site_zoom, m.min_zoom, m.max_zoom
            )));
        }
        if !(0.0..=1.0).contains(&m.default_opacity) {
            return Err(ConfigError::Invalid(format!(
                "default_opacity ({}) outside [0, 1]",
                m.default_opacity
            )));
        }
        if self.intervals.stats_update_ms == 0 {
            return Err(ConfigError::Invalid(
                "stats_update_ms must be positive".to_string(),
            ));
        }
        if self.analysis.cluster_threshold_deg <= 0.0
            || !self.analysis.cluster_threshold_deg.is_finite()
        {
            return Err(ConfigError::Invalid(format!(
                "cluster_threshold_deg ({}) must be positive",
                self.analysis.cluster_threshold_deg
            )));
        }
        if self.analysis.top_sites == 0 {
            return Err(ConfigError::Invalid(
                "top_sites must be at least 1".to_string(),
            ));
        }
        self.sensitivity().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}
