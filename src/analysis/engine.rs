//! Analysis orchestration.
//!
//! Every run follows the same arc: show the loading indicator, wait out
//! the simulated sensing latency, compute from the current registry
//! snapshot, store the record, notify the user, hide the indicator. Runs
//! always complete; there is no cancellation and no retry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::metrics;
use super::reports;
use super::results::{
    AnalysisKind, AnalysisPayload, AnalysisRecord, BatchEntry, BatchImpact, ChangeReport,
    DetectionSummary, ResultStore, RunState, Trend, ViolationItem, ViolationReport,
    VolumeEstimate,
};
use super::spatial::{self, SpatialSummary};
use crate::api::Site;
use crate::config::{AnalysisSettings, LatencySettings, MonitorConfig};
use crate::export::ExportFormat;
use crate::latency::{Latency, SimulatedDelay};
use crate::registry::SiteRegistry;
use crate::sampling::{NoiseSource, SplitMixNoise};
use crate::ui::{LoadingIndicator, LogNotifier, MapView, Notifier, NullLoading, NullMapView};

/// Detection sensitivity. Only changes the wording of detection output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSensitivity {
    Low,
    Medium,
    High,
}

impl DetectionSensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionSensitivity::Low => "low",
            DetectionSensitivity::Medium => "medium",
            DetectionSensitivity::High => "high",
        }
    }
}

impl Default for DetectionSensitivity {
    fn default() -> Self {
        DetectionSensitivity::Medium
    }
}

impl std::fmt::Display for DetectionSensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DetectionSensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(DetectionSensitivity::Low),
            "medium" => Ok(DetectionSensitivity::Medium),
            "high" => Ok(DetectionSensitivity::High),
            other => Err(format!("Unknown sensitivity level: {}", other)),
        }
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Orchestrates analysis runs over the shared site registry.
pub struct AnalysisEngine {
    registry: SiteRegistry,
    results: ResultStore,
    notifier: Arc<dyn Notifier>,
    loading: Arc<dyn LoadingIndicator>,
    map: Arc<dyn MapView>,
    latency: Arc<dyn Latency>,
    noise: Arc<dyn NoiseSource>,
    delays: LatencySettings,
    settings: AnalysisSettings,
    sensitivity: RwLock<DetectionSensitivity>,
}

impl AnalysisEngine {
    /// Engine with headless collaborators; front-ends swap in their own
    /// via the `with_*` methods.
    pub fn new(registry: SiteRegistry, config: &MonitorConfig) -> Self {
        Self {
            registry,
            results: ResultStore::new(),
            notifier: Arc::new(LogNotifier),
            loading: Arc::new(NullLoading),
            map: Arc::new(NullMapView),
            latency: Arc::new(SimulatedDelay),
            noise: Arc::new(SplitMixNoise::from_time()),
            delays: config.latency.clone(),
            settings: config.analysis.clone(),
            sensitivity: RwLock::new(config.sensitivity().unwrap_or_default()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_loading(mut self, loading: Arc<dyn LoadingIndicator>) -> Self {
        self.loading = loading;
        self
    }

    pub fn with_map(mut self, map: Arc<dyn MapView>) -> Self {
        self.map = map;
        self
    }

    pub fn with_latency(mut self, latency: Arc<dyn Latency>) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_noise(mut self, noise: Arc<dyn NoiseSource>) -> Self {
        self.noise = noise;
        self
    }

    fn begin(&self, kind: AnalysisKind, label: &str) {
        log::info!("Running {} analysis", kind);
        self.loading.show(label);
        self.results.mark_running(kind);
    }

    fn finish(&self) {
        self.loading.hide();
    }

    async fn pause(&self, millis: u64) {
        self.latency.pause(Duration::from_millis(millis)).await;
    }

    /// Sweep the whole survey area for mining activity.
    pub async fn run_detection(&self) -> DetectionSummary {
        self.begin(AnalysisKind::Detection, "Detecting mining areas");
        self.pause(self.delays.detection_ms).await;

        let sites = self.registry.all();
        let new_sites = (self.noise.sample() * 3.0).floor() as u32 + 1;
        let summary = DetectionSummary {
            new_sites,
            active_sites: metrics::active_count(&sites),
            violations: metrics::violation_count(&sites),
            total_area_ha: metrics::total_area(&sites),
        };

        self.results.store(AnalysisRecord::new(
            AnalysisKind::Detection,
            AnalysisPayload::Detection(summary.clone()),
        ));
        self.notifier
            .success(&reports::detection_message(&summary, self.sensitivity()));
        self.finish();
        summary
    }

    /// Volume breakdown for the selected site.
    ///
    /// Fails softly when nothing is selected: a warning notification and
    /// `None`, with no record written.
    pub async fn estimate_volume(&self) -> Option<VolumeEstimate> {
        let Some(site) = self.registry.selected() else {
            self.notifier.warning("Please select a mining site first");
            return None;
        };

        self.begin(AnalysisKind::Volume, "Calculating volume");
        self.pause(self.delays.volume_ms).await;

        let estimate = VolumeEstimate {
            site_id: site.id,
            site_name: site.name.clone(),
            total_volume_mcm: site.volume_mcm,
            avg_depth_m: site.depth_m,
            max_depth_m: round1(site.depth_m * 1.8),
            min_depth_m: round1(site.depth_m * 0.6),
            area_ha: site.area_ha,
            accuracy_pct: 95,
        };

        self.results.store(AnalysisRecord::new(
            AnalysisKind::Volume,
            AnalysisPayload::Volume(estimate.clone()),
        ));
        self.notifier
            .info(&reports::volume_message(&estimate, Utc::now()));
        self.finish();
        Some(estimate)
    }

    /// Sweep for illegal operations and render the violation report.
    pub async fn run_illegal_sweep(&self) -> ViolationReport {
        self.begin(AnalysisKind::Illegal, "Scanning for illegal activity");
        self.pause(self.delays.illegal_ms).await;

        let illegal = self.registry.illegal_sites();
        let mut items: Vec<ViolationItem> = illegal
            .iter()
            .map(|site| ViolationItem {
                id: site.id,
                name: site.name.clone(),
                location: site.location,
                area_ha: site.area_ha,
                material: site.material.clone(),
                damage: metrics::damage_estimate(site.area_ha, site.volume_mcm),
                priority: metrics::priority_score(site),
            })
            .collect();
        // Stable sort keeps registry order for equal priorities
        items.sort_by(|a, b| b.priority.cmp(&a.priority));

        let report = ViolationReport {
            count: items.len(),
            sites: items,
        };

        self.results.store(AnalysisRecord::new(
            AnalysisKind::Illegal,
            AnalysisPayload::Illegal(report.clone()),
        ));
        self.notifier
            .warning(&reports::violation_report_text(&report, Utc::now()));
        for item in &report.sites {
            self.map.pulse_site(item.id);
        }
        self.finish();
        report
    }

    /// Assess every site's environmental impact.
    pub async fn run_batch_assessment(&self) -> BatchImpact {
        self.begin(AnalysisKind::BatchAnalysis, "Analyzing all sites");
        self.pause(self.delays.batch_ms).await;

        let sites = self.registry.all();
        let mut entries: Vec<BatchEntry> = sites
            .iter()
            .map(|site| BatchEntry {
                id: site.id,
                name: site.name.clone(),
                status: site.status,
                area_ha: site.area_ha,
                volume_mcm: site.volume_mcm,
                impact: metrics::environmental_impact(site),
                illegal: site.illegal,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.impact
                .score
                .partial_cmp(&a.impact.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let batch = BatchImpact { entries };

        self.results.store(AnalysisRecord::new(
            AnalysisKind::BatchAnalysis,
            AnalysisPayload::Batch(batch.clone()),
        ));
        self.notifier.info(&reports::batch_report_text(
            &batch,
            self.settings.top_sites,
            Utc::now(),
        ));
        self.finish();
        batch
    }

    /// One-shot spatial overview. Computed on demand, never stored.
    pub fn spatial_summary(&self) -> SpatialSummary {
        let summary = spatial::spatial_summary(
            &self.registry.all(),
            self.settings.cluster_threshold_deg,
        );
        log::info!(
            "Spatial analysis: {} sites, {} clusters, avg distance {:.2}°",
            summary.total_sites,
            summary.cluster_count,
            summary.average_distance_deg
        );
        summary
    }

    /// Announce a temporal comparison for the selected site, or for all
    /// sites when nothing is selected.
    pub fn temporal_preview(&self) {
        let selected = self.registry.selected();
        let name = selected.as_ref().map(|s| s.name.as_str());
        self.notifier.info(&reports::temporal_message(name));
    }

    /// Simulated change summary between two capture dates.
    pub fn change_report(
        &self,
        site: &Site,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> ChangeReport {
        let area_change_ha = round2(self.noise.sample() * 2.0 - 1.0);
        let volume_change_mcm = round2(self.noise.sample() * 0.5 - 0.25);
        let activity = if self.noise.sample() > 0.5 {
            Trend::Increased
        } else {
            Trend::Decreased
        };
        let vegetation_loss_pct = round1(self.noise.sample() * 30.0);

        ChangeReport {
            site_name: site.name.clone(),
            period_start,
            period_end,
            area_change_ha,
            volume_change_mcm,
            activity,
            vegetation_loss_pct,
            generated_at: Utc::now(),
        }
    }

    /// Pretend-export of the site dataset. Produces no file, only the
    /// filename the front-end shows.
    pub async fn export_dataset(&self, format: ExportFormat) -> String {
        self.loading.show("Preparing export");
        self.pause(self.delays.export_ms).await;

        let filename = crate::export::export_filename(format, Utc::now());
        self.notifier.success(&format!(
            "✅ Export Successful!\n\n\
             Format: {}\n\
             File: {}\n\n\
             The file has been prepared for download.",
            format, filename
        ));
        self.loading.hide();
        filename
    }

    pub fn sensitivity(&self) -> DetectionSensitivity {
        *self.sensitivity.read()
    }

    pub fn set_sensitivity(&self, level: DetectionSensitivity) {
        *self.sensitivity.write() = level;
        log::debug!("Detection sensitivity set to: {}", level);
    }

    pub fn state(&self, kind: AnalysisKind) -> RunState {
        self.results.state(kind)
    }

    pub fn results(&self, kind: AnalysisKind) -> Option<AnalysisRecord> {
        self.results.get(kind)
    }

    pub fn all_results(&self) -> HashMap<AnalysisKind, AnalysisRecord> {
        self.results.snapshot()
    }

    pub fn clear_results(&self) {
        self.results.clear();
        log::info!("Analysis results cleared");
    }

    /// Latest results as pretty JSON.
    pub fn export_results_json(&self) -> serde_json::Result<String> {
        crate::export::results_json(&self.results.snapshot())
    }

    /// Latest results as CSV rows.
    pub fn export_results_csv(&self) -> serde_json::Result<String> {
        crate::export::results_csv(&self.results.snapshot())
    }
}
