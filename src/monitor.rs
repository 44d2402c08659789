//! Top-level monitor context.
//!
//! `MiningMonitor` owns the registry, the analysis engine, and the
//! front-end collaborators, and drives the startup sequence the
//! demonstrator runs on load. Build one through [`MonitorBuilder`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use serde_json::json;

use crate::analysis::engine::AnalysisEngine;
use crate::api::{Site, SiteId};
use crate::config::MonitorConfig;
use crate::dataset;
use crate::export;
use crate::latency::Latency;
use crate::overlay;
use crate::registry::{RegistryResult, SiteRegistry};
use crate::sampling::{NoiseSource, SplitMixNoise};
use crate::ui::{LoadingIndicator, LogNotifier, MapView, Notifier, NullMapView};

/// Headline numbers shown above the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub total_area_ha: f64,
    pub active_sites: usize,
    pub violations: usize,
}

impl std::fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Area: {:.1}ha, Active: {}, Violations: {}",
            self.total_area_ha, self.active_sites, self.violations
        )
    }
}

/// Jittered display area for one stats tick.
///
/// Roughly three ticks in ten show a small fluctuation around the real
/// total; the rest leave the display untouched.
pub fn jittered_area(base_area_ha: f64, noise: &dyn NoiseSource) -> Option<f64> {
    if noise.sample() > 0.7 {
        Some(base_area_ha + (noise.sample() - 0.5) * 2.0)
    } else {
        None
    }
}

/// Fluent builder for [`MiningMonitor`].
///
/// Collaborators default to the headless implementations, so a bare
/// `MonitorBuilder::new().build()` yields a monitor that only logs.
#[derive(Default)]
pub struct MonitorBuilder {
    config: Option<MonitorConfig>,
    config_path: Option<PathBuf>,
    map: Option<Arc<dyn MapView>>,
    notifier: Option<Arc<dyn Notifier>>,
    loading: Option<Arc<dyn LoadingIndicator>>,
    latency: Option<Arc<dyn Latency>>,
    noise: Option<Arc<dyn NoiseSource>>,
}

impl MonitorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn from_config_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_map(mut self, map: Arc<dyn MapView>) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_loading(mut self, loading: Arc<dyn LoadingIndicator>) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn with_latency(mut self, latency: Arc<dyn Latency>) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_noise(mut self, noise: Arc<dyn NoiseSource>) -> Self {
        self.noise = Some(noise);
        self
    }

    pub fn build(self) -> anyhow::Result<MiningMonitor> {
        let config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => MonitorConfig::from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            (None, None) => MonitorConfig::from_default_location()
                .context("Failed to load default configuration")?,
        };

        let map: Arc<dyn MapView> = self.map.unwrap_or_else(|| Arc::new(NullMapView));
        let notifier: Arc<dyn Notifier> = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));
        let noise: Arc<dyn NoiseSource> =
            self.noise.unwrap_or_else(|| Arc::new(SplitMixNoise::from_time()));

        let registry = SiteRegistry::new();
        let mut engine = AnalysisEngine::new(registry.clone(), &config)
            .with_map(Arc::clone(&map))
            .with_notifier(Arc::clone(&notifier))
            .with_noise(Arc::clone(&noise));
        if let Some(loading) = self.loading {
            engine = engine.with_loading(loading);
        }
        if let Some(latency) = self.latency {
            engine = engine.with_latency(latency);
        }

        Ok(MiningMonitor {
            config,
            registry,
            engine: Arc::new(engine),
            map,
            notifier,
            noise,
        })
    }
}

/// The assembled monitor.
pub struct MiningMonitor {
    config: MonitorConfig,
    registry: SiteRegistry,
    engine: Arc<AnalysisEngine>,
    map: Arc<dyn MapView>,
    notifier: Arc<dyn Notifier>,
    noise: Arc<dyn NoiseSource>,
}

impl MiningMonitor {
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// Startup sequence: load the bundled dataset, draw every site, and
    /// publish the initial statistics.
    pub fn init(&self) -> anyhow::Result<()> {
        match self.try_init() {
            Ok(()) => {
                log::info!("System initialized successfully");
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to initialize application: {:#}", err);
                self.notifier
                    .error("Failed to initialize application. Please refresh the page.");
                Err(err)
            }
        }
    }

    fn try_init(&self) -> anyhow::Result<()> {
        let sites = dataset::sample_sites().context("Failed to load bundled site data")?;
        self.registry.load(sites)?;
        self.redraw_sites();
        log::info!("Stats updated - {}", self.stats());
        Ok(())
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    fn redraw_sites(&self) {
        for site in self.registry.all() {
            let style = overlay::style_for(site.status, &self.config.colors);
            self.map.upsert_site(&site, &style);
        }
    }

    /// Select a site: move the highlight and pan the map to it.
    pub fn select_site(&self, id: SiteId) -> RegistryResult<()> {
        let previous = self.registry.selected();
        self.registry.select(id)?;
        if let Some(previous) = previous {
            self.map.set_highlight(previous.id, false);
        }
        self.map.set_highlight(id, true);
        if let Some(site) = self.registry.get(id) {
            self.map
                .pan_to(&site.location, Some(self.config.map.site_zoom));
            log::debug!("Selected site: {}", site.name);
        }
        Ok(())
    }

    pub fn clear_selection(&self) {
        if let Some(previous) = self.registry.selected() {
            self.map.set_highlight(previous.id, false);
        }
        self.registry.clear_selection();
    }

    pub fn add_site(&self, site: Site) -> RegistryResult<()> {
        let style = overlay::style_for(site.status, &self.config.colors);
        self.registry.add(site.clone())?;
        self.map.upsert_site(&site, &style);
        Ok(())
    }

    pub fn remove_site(&self, id: SiteId) -> RegistryResult<()> {
        self.registry.remove(id)?;
        self.map.remove_site(id);
        Ok(())
    }

    pub fn stats(&self) -> StatsSnapshot {
        let sites = self.registry.all();
        StatsSnapshot {
            total_area_ha: crate::analysis::metrics::total_area(&sites),
            active_sites: crate::analysis::metrics::active_count(&sites),
            violations: crate::analysis::metrics::violation_count(&sites),
        }
    }

    /// Draw dashed legal-boundary rectangles around compliant sites.
    pub fn show_legal_boundaries(&self) {
        let rects = overlay::legal_boundaries(&self.registry.all());
        log::info!("Added {} boundary layers", rects.len());
        self.map.show_boundaries(&rects);
    }

    /// Draw the activity heatmap and announce it.
    pub fn show_heatmap(&self) {
        let points = overlay::heat_points(&self.registry.all());
        self.map.show_heatmap(&points);
        self.notifier.info(overlay::heatmap_notice());
    }

    pub fn clear_overlays(&self) {
        self.map.clear_overlays();
        log::info!("All overlays cleared");
    }

    /// Rescale site layer opacity from the slider value in `[0, 1]`.
    pub fn set_layer_opacity(&self, opacity: f64) {
        self.map.set_site_opacity(opacity.clamp(0.0, 1.0));
    }

    /// Generate the full activity report and notify it.
    pub fn generate_report(&self) -> String {
        let report = export::activity_report(&self.registry.all(), Utc::now());
        self.notifier.info(&report);
        log::info!("{}", report);
        report
    }

    /// Serialized application state, the autosave payload.
    pub fn state_snapshot(&self) -> serde_json::Result<String> {
        let results: std::collections::BTreeMap<&str, _> = self
            .engine
            .all_results()
            .into_iter()
            .map(|(kind, record)| (kind.as_str(), record))
            .collect();
        serde_json::to_string(&json!({
            "sites": self.registry.all(),
            "selected_site": self.registry.selected().map(|s| s.id),
            "analysis_results": results,
        }))
    }

    /// One stats tick. Returns the jittered display area when this tick
    /// fluctuates, `None` when the display stays as is.
    pub fn stats_tick(&self) -> Option<f64> {
        let stats = self.stats();
        let area = jittered_area(stats.total_area_ha, self.noise.as_ref())?;
        log::info!(
            "Stats updated - Area: {:.1}ha, Active: {}, Violations: {}",
            area,
            stats.active_sites,
            stats.violations
        );
        Some(area)
    }

    /// Periodic stats refresh. Runs until the owning task is dropped.
    pub async fn run_stats_ticker(&self) {
        log::info!("Real-time stats updates started");
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.intervals.stats_update_ms));
        loop {
            interval.tick().await;
            self.stats_tick();
        }
    }

    /// Periodic state snapshot. Runs until the owning task is dropped.
    pub async fn run_autosave_ticker(&self) {
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.intervals.auto_save_ms));
        loop {
            interval.tick().await;
            match self.state_snapshot() {
                Ok(snapshot) => {
                    log::debug!("Auto-saved application state ({} bytes)", snapshot.len())
                }
                Err(err) => log::warn!("Autosave failed: {}", err),
            }
        }
    }
}
