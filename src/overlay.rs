//! Map overlay computation.
//!
//! Pure helpers that turn the current site list into renderable overlay
//! data: legal-boundary rectangles, activity heat circles, and the
//! per-status layer styles. Front-ends hand the results to their
//! [`MapView`](crate::ui::MapView) implementation.

use crate::analysis::metrics;
use crate::api::{GeoPoint, Site, SiteId, SiteStatus};
use crate::config::StatusPalette;
use crate::ui::LayerStyle;

/// Padding around a site's bounding box, in degrees.
pub const BOUNDARY_PAD_DEG: f64 = 0.001;

/// Dashed rectangle drawn around a legally operating site.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRect {
    pub site_id: SiteId,
    /// Tooltip text, e.g. `Legal Boundary: Jharia Coal Mines`.
    pub label: String,
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundaryRect {
    pub const DASH_PATTERN: &'static str = "10, 5";

    /// Rendering style shared by all legal-boundary rectangles.
    pub fn style() -> LayerStyle {
        LayerStyle {
            border: "#00FF00".to_string(),
            fill: "#00FF00".to_string(),
            weight: 2,
            line_opacity: 0.6,
            fill_opacity: 0.05,
        }
    }
}

/// One circle of the activity heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatPoint {
    pub site_id: SiteId,
    pub center: GeoPoint,
    /// Circle radius in metres, `sqrt(area_ha) * 1000`.
    pub radius_m: f64,
    /// Activity intensity in `[0, 1]`.
    pub intensity: f64,
    pub color: &'static str,
}

/// Padded bounding rectangles for every site not flagged illegal.
///
/// Sites without boundary coordinates are skipped.
pub fn legal_boundaries(sites: &[Site]) -> Vec<BoundaryRect> {
    sites
        .iter()
        .filter(|site| !site.illegal)
        .filter_map(|site| {
            let mut points = site.boundary.iter();
            let first = points.next()?;
            let mut south = first.latitude;
            let mut north = first.latitude;
            let mut west = first.longitude;
            let mut east = first.longitude;
            for point in points {
                south = south.min(point.latitude);
                north = north.max(point.latitude);
                west = west.min(point.longitude);
                east = east.max(point.longitude);
            }
            Some(BoundaryRect {
                site_id: site.id,
                label: format!("Legal Boundary: {}", site.name),
                south: south - BOUNDARY_PAD_DEG,
                west: west - BOUNDARY_PAD_DEG,
                north: north + BOUNDARY_PAD_DEG,
                east: east + BOUNDARY_PAD_DEG,
            })
        })
        .collect()
}

/// Heat circles for all active sites.
pub fn heat_points(sites: &[Site]) -> Vec<HeatPoint> {
    sites
        .iter()
        .filter(|site| site.status == SiteStatus::Active)
        .map(|site| {
            let intensity = metrics::heat_intensity(site);
            HeatPoint {
                site_id: site.id,
                center: site.location,
                radius_m: site.area_ha.sqrt() * 1000.0,
                intensity,
                color: heat_color(intensity),
            }
        })
        .collect()
}

/// Gradient from gold (low activity) through orange to red (very high).
pub fn heat_color(intensity: f64) -> &'static str {
    if intensity > 0.8 {
        "#FF0000"
    } else if intensity > 0.6 {
        "#FF4500"
    } else if intensity > 0.4 {
        "#FF8C00"
    } else if intensity > 0.2 {
        "#FFA500"
    } else {
        "#FFD700"
    }
}

/// Notification shown when the heatmap overlay is switched on.
pub fn heatmap_notice() -> &'static str {
    "🔥 Heatmap Overlay Activated\n\n\
     Showing mining activity intensity based on:\n\
     • Site area\n\
     • Mining volume\n\
     • Activity status\n\n\
     Red areas indicate highest activity"
}

/// Default polygon style for a site of the given status.
pub fn style_for(status: SiteStatus, palette: &StatusPalette) -> LayerStyle {
    let colors = palette.for_status(status);
    LayerStyle {
        border: colors.border.clone(),
        fill: colors.fill.clone(),
        weight: 3,
        line_opacity: 0.8,
        fill_opacity: 0.3,
    }
}

/// Style with opacity rescaled by the layer-opacity slider value.
pub fn opacity_scaled(base: &LayerStyle, opacity: f64) -> LayerStyle {
    LayerStyle {
        line_opacity: opacity * 0.8,
        fill_opacity: opacity * 0.5,
        ..base.clone()
    }
}
