//! Front-end collaborator seams.
//!
//! The monitor core never renders anything itself. It talks to the outside
//! world through the trait objects defined here: a map surface, a
//! notification sink and a loading indicator. Production front-ends
//! implement these; tests substitute recording fakes.

use serde::{Deserialize, Serialize};

use crate::api::{GeoPoint, Site, SiteId};
use crate::overlay::{BoundaryRect, HeatPoint};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visual styling for one site layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub border: String,
    pub fill: String,
    pub weight: u8,
    pub line_opacity: f64,
    pub fill_opacity: f64,
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);

    fn info(&self, message: &str) {
        self.notify(message, Severity::Info);
    }

    fn success(&self, message: &str) {
        self.notify(message, Severity::Success);
    }

    fn warning(&self, message: &str) {
        self.notify(message, Severity::Warning);
    }

    fn error(&self, message: &str) {
        self.notify(message, Severity::Error);
    }
}

/// Busy indicator shown while an analysis run is in flight.
///
/// Implementations must tolerate repeated `show`/`hide` calls.
pub trait LoadingIndicator: Send + Sync {
    fn show(&self, label: &str);
    fn hide(&self);
}

/// Rendering surface for site layers and overlays.
///
/// The core only asks it to add, remove or restyle layers; how (or
/// whether) they are drawn is the implementation's business.
pub trait MapView: Send + Sync {
    /// Add or refresh the layer for one site.
    fn upsert_site(&self, site: &Site, style: &LayerStyle);

    fn remove_site(&self, id: SiteId);

    /// Emphasize the selected site (heavier border) or reset it.
    fn set_highlight(&self, id: SiteId, emphasized: bool);

    fn pan_to(&self, point: &GeoPoint, zoom: Option<u8>);

    /// Flash one site's layer to draw attention to a violation.
    fn pulse_site(&self, id: SiteId);

    fn show_boundaries(&self, rects: &[BoundaryRect]);

    fn show_heatmap(&self, points: &[HeatPoint]);

    fn clear_overlays(&self);

    fn set_site_opacity(&self, opacity: f64);
}

/// Notifier that forwards everything to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => log::info!("[{}] {}", severity, message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
    }
}

/// Loading indicator that does nothing. Useful for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLoading;

impl LoadingIndicator for NullLoading {
    fn show(&self, _label: &str) {}

    fn hide(&self) {}
}

/// Map view that renders nothing. Useful for headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMapView;

impl MapView for NullMapView {
    fn upsert_site(&self, site: &Site, _style: &LayerStyle) {
        log::trace!("map: upsert layer for site {}", site.id);
    }

    fn remove_site(&self, id: SiteId) {
        log::trace!("map: remove layer for site {}", id);
    }

    fn set_highlight(&self, _id: SiteId, _emphasized: bool) {}

    fn pan_to(&self, _point: &GeoPoint, _zoom: Option<u8>) {}

    fn pulse_site(&self, _id: SiteId) {}

    fn show_boundaries(&self, _rects: &[BoundaryRect]) {}

    fn show_heatmap(&self, _points: &[HeatPoint]) {}

    fn clear_overlays(&self) {}

    fn set_site_opacity(&self, _opacity: f64) {}
}
