//! Spatial relationships between site centers.
//!
//! All geometry is planar in raw degree space. At sub-degree scale the
//! monitor only needs relative proximity, so no geodesic correction is
//! applied anywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics;
use crate::api::{Site, SiteId};

/// Summary of one spatial analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialSummary {
    pub total_sites: usize,
    pub total_area_ha: f64,
    pub average_area_ha: f64,
    pub cluster_count: usize,
    pub average_distance_deg: f64,
    pub generated_at: DateTime<Utc>,
}

/// Euclidean distance between two site centers, in degrees.
pub fn distance(a: &Site, b: &Site) -> f64 {
    let dlat = a.location.latitude - b.location.latitude;
    let dlon = a.location.longitude - b.location.longitude;
    (dlat * dlat + dlon * dlon).sqrt()
}

/// Greedy seed-anchored clustering.
///
/// Walks the sites in order; each unvisited site becomes a seed and
/// absorbs every still-unvisited site strictly within `threshold` of the
/// seed itself. Clusters with a single member are dropped.
///
/// Membership is measured against the seed only, never against absorbed
/// members, so the result is order-dependent and not transitive.
pub fn find_clusters(sites: &[Site], threshold: f64) -> Vec<Vec<SiteId>> {
    let mut visited = vec![false; sites.len()];
    let mut clusters = Vec::new();

    for (i, seed) in sites.iter().enumerate() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let mut cluster = vec![seed.id];

        for (j, other) in sites.iter().enumerate() {
            if i == j || visited[j] {
                continue;
            }
            if distance(seed, other) < threshold {
                cluster.push(other.id);
                visited[j] = true;
            }
        }

        if cluster.len() > 1 {
            clusters.push(cluster);
        }
    }

    clusters
}

/// Mean distance over all unique site pairs, 0 when fewer than two sites.
pub fn average_distance(sites: &[Site]) -> f64 {
    if sites.len() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut count = 0usize;
    for i in 0..sites.len() - 1 {
        for j in (i + 1)..sites.len() {
            total += distance(&sites[i], &sites[j]);
            count += 1;
        }
    }
    total / count as f64
}

/// One-shot spatial overview of the current snapshot.
pub fn spatial_summary(sites: &[Site], threshold: f64) -> SpatialSummary {
    SpatialSummary {
        total_sites: sites.len(),
        total_area_ha: metrics::total_area(sites),
        average_area_ha: metrics::average_area(sites),
        cluster_count: find_clusters(sites, threshold).len(),
        average_distance_deg: average_distance(sites),
        generated_at: Utc::now(),
    }
}
