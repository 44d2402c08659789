use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use orenexus::analysis::engine::AnalysisEngine;
use orenexus::api::{GeoPoint, Site, SiteId, SiteStatus};
use orenexus::config::MonitorConfig;
use orenexus::latency::NoDelay;
use orenexus::overlay::{BoundaryRect, HeatPoint};
use orenexus::registry::SiteRegistry;
use orenexus::sampling::FixedNoise;
use orenexus::ui::{LayerStyle, LoadingIndicator, MapView, Notifier, Severity};

/// Notifier that records every message together with its severity.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.lock().clone()
    }

    pub fn last(&self) -> Option<(Severity, String)> {
        self.messages.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages.lock().push((severity, message.to_string()));
    }
}

/// Loading indicator that counts calls, for pairing assertions.
#[derive(Default)]
pub struct CountingLoading {
    shows: Mutex<Vec<String>>,
    hides: AtomicUsize,
}

impl CountingLoading {
    pub fn show_labels(&self) -> Vec<String> {
        self.shows.lock().clone()
    }

    pub fn show_count(&self) -> usize {
        self.shows.lock().len()
    }

    pub fn hide_count(&self) -> usize {
        self.hides.load(Ordering::SeqCst)
    }
}

impl LoadingIndicator for CountingLoading {
    fn show(&self, label: &str) {
        self.shows.lock().push(label.to_string());
    }

    fn hide(&self) {
        self.hides.fetch_add(1, Ordering::SeqCst);
    }
}

/// Map view that records every call it receives.
#[derive(Default)]
pub struct RecordingMap {
    pub upserts: Mutex<Vec<SiteId>>,
    pub removals: Mutex<Vec<SiteId>>,
    pub highlights: Mutex<Vec<(SiteId, bool)>>,
    pub pans: Mutex<Vec<(f64, f64, Option<u8>)>>,
    pub pulses: Mutex<Vec<SiteId>>,
    pub boundary_batches: Mutex<Vec<usize>>,
    pub heat_batches: Mutex<Vec<usize>>,
    pub overlay_clears: AtomicUsize,
    pub opacities: Mutex<Vec<f64>>,
}

impl MapView for RecordingMap {
    fn upsert_site(&self, site: &Site, _style: &LayerStyle) {
        self.upserts.lock().push(site.id);
    }

    fn remove_site(&self, id: SiteId) {
        self.removals.lock().push(id);
    }

    fn set_highlight(&self, id: SiteId, emphasized: bool) {
        self.highlights.lock().push((id, emphasized));
    }

    fn pan_to(&self, point: &GeoPoint, zoom: Option<u8>) {
        self.pans
            .lock()
            .push((point.latitude, point.longitude, zoom));
    }

    fn pulse_site(&self, id: SiteId) {
        self.pulses.lock().push(id);
    }

    fn show_boundaries(&self, rects: &[BoundaryRect]) {
        self.boundary_batches.lock().push(rects.len());
    }

    fn show_heatmap(&self, points: &[HeatPoint]) {
        self.heat_batches.lock().push(points.len());
    }

    fn clear_overlays(&self) {
        self.overlay_clears.fetch_add(1, Ordering::SeqCst);
    }

    fn set_site_opacity(&self, opacity: f64) {
        self.opacities.lock().push(opacity);
    }
}

/// Minimal valid site with the fields the analyses read.
pub fn test_site(
    id: i64,
    lat: f64,
    lon: f64,
    status: SiteStatus,
    illegal: bool,
    area_ha: f64,
    depth_m: f64,
    volume_mcm: f64,
) -> Site {
    Site {
        id: SiteId::new(id),
        name: format!("Test Site {}", id),
        location: GeoPoint::new(lat, lon).unwrap(),
        status,
        area_ha,
        depth_m,
        volume_mcm,
        material: "Coal".to_string(),
        operator: "Test Mining Corp.".to_string(),
        illegal,
        boundary: vec![
            GeoPoint::new(lat, lon).unwrap(),
            GeoPoint::new(lat + 0.02, lon).unwrap(),
            GeoPoint::new(lat + 0.02, lon + 0.03).unwrap(),
            GeoPoint::new(lat, lon + 0.03).unwrap(),
        ],
    }
}

/// Engine wired to recording collaborators, zero latency, and a fixed
/// noise sequence.
pub struct TestEngine {
    pub registry: SiteRegistry,
    pub engine: AnalysisEngine,
    pub notifier: Arc<RecordingNotifier>,
    pub loading: Arc<CountingLoading>,
    pub map: Arc<RecordingMap>,
}

/// Harness over the bundled sample dataset.
pub fn sample_engine(noise: Vec<f64>) -> TestEngine {
    let sites = orenexus::dataset::sample_sites().unwrap();
    engine_with_sites(sites, noise)
}

/// Harness over an explicit site list.
pub fn engine_with_sites(sites: Vec<Site>, noise: Vec<f64>) -> TestEngine {
    let registry = SiteRegistry::new();
    registry.load(sites).unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    let loading = Arc::new(CountingLoading::default());
    let map = Arc::new(RecordingMap::default());

    let engine = AnalysisEngine::new(registry.clone(), &MonitorConfig::default())
        .with_notifier(notifier.clone())
        .with_loading(loading.clone())
        .with_map(map.clone())
        .with_latency(Arc::new(NoDelay))
        .with_noise(Arc::new(FixedNoise::new(noise)));

    TestEngine {
        registry,
        engine,
        notifier,
        loading,
        map,
    }
}
