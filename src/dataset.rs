//! Site dataset ingestion.
//!
//! Parses site records from the JSON interchange form (center point as a
//! `[lat, lon]` pair, boundary under `coordinates`, material under `type`)
//! into validated [`Site`] values. The crate bundles a ten-site
//! demonstration dataset under `data/`.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::{GeoPoint, Site, SiteId, SiteStatus};

const SAMPLE_SITES_JSON: &str = include_str!("../data/sample_sites.json");

/// Raw site record as it appears in dataset files.
#[derive(Debug, Deserialize)]
struct SiteInput {
    id: i64,
    name: String,
    location: [f64; 2],
    status: String,
    area: f64,
    depth: f64,
    volume: f64,
    #[serde(rename = "type")]
    material: String,
    operator: String,
    illegal: bool,
    coordinates: Vec<[f64; 2]>,
}

impl SiteInput {
    fn into_site(self) -> Result<Site> {
        let location = GeoPoint::new(self.location[0], self.location[1])
            .map_err(|e| anyhow::anyhow!("Site '{}': {}", self.name, e))?;

        let status: SiteStatus = self
            .status
            .parse()
            .map_err(|e: String| anyhow::anyhow!("Site '{}': {}", self.name, e))?;

        let boundary = self
            .coordinates
            .iter()
            .map(|pair| {
                GeoPoint::new(pair[0], pair[1])
                    .map_err(|e| anyhow::anyhow!("Site '{}' boundary: {}", self.name, e))
            })
            .collect::<Result<Vec<_>>>()?;

        let site = Site {
            id: SiteId::new(self.id),
            name: self.name,
            location,
            status,
            area_ha: self.area,
            depth_m: self.depth,
            volume_mcm: self.volume,
            material: self.material,
            operator: self.operator,
            illegal: self.illegal,
            boundary,
        };

        site.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(site)
    }
}

/// Parse a JSON array of site records.
///
/// Every record is validated and ids must be unique across the dataset.
pub fn parse_sites_json_str(json: &str) -> Result<Vec<Site>> {
    let inputs: Vec<SiteInput> =
        serde_json::from_str(json).context("Failed to deserialize site dataset JSON")?;

    let mut seen = HashSet::new();
    let mut sites = Vec::with_capacity(inputs.len());
    for input in inputs {
        if !seen.insert(input.id) {
            anyhow::bail!("Duplicate site id {} in dataset", input.id);
        }
        sites.push(input.into_site()?);
    }

    Ok(sites)
}

/// The bundled demonstration dataset (ten Indian mining sites).
pub fn sample_sites() -> Result<Vec<Site>> {
    parse_sites_json_str(SAMPLE_SITES_JSON).context("Bundled sample dataset is malformed")
}
