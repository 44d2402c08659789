//! In-memory site registry.
//!
//! Holds the monitored site collection and the current selection behind a
//! cheap-clone handle. All accessors return owned snapshots so callers
//! never hold the lock across their own work.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::api::{Site, SiteId, SiteStatus};

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised by registry mutations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// Requested site is not in the registry.
    #[error("Site {id} not found")]
    NotFound { id: SiteId },

    /// A site with this id is already registered.
    #[error("Site {id} already registered")]
    DuplicateId { id: SiteId },

    /// The record failed structural validation.
    #[error("Invalid site record: {reason}")]
    InvalidSite { reason: String },
}

/// Shared in-memory registry of mining sites.
///
/// Cloning is cheap and every clone observes the same state.
#[derive(Clone, Default)]
pub struct SiteRegistry {
    data: Arc<RwLock<RegistryData>>,
}

#[derive(Default)]
struct RegistryData {
    sites: Vec<Site>,
    selected: Option<SiteId>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection, clearing any selection.
    ///
    /// Records are validated and ids must be unique.
    pub fn load(&self, sites: Vec<Site>) -> RegistryResult<()> {
        for site in &sites {
            site.validate()
                .map_err(|reason| RegistryError::InvalidSite { reason })?;
        }
        let mut seen = std::collections::HashSet::new();
        for site in &sites {
            if !seen.insert(site.id) {
                return Err(RegistryError::DuplicateId { id: site.id });
            }
        }

        let mut data = self.data.write();
        log::info!("Loaded {} mining sites", sites.len());
        data.sites = sites;
        data.selected = None;
        Ok(())
    }

    /// Snapshot of every site in insertion order.
    pub fn all(&self) -> Vec<Site> {
        self.data.read().sites.clone()
    }

    pub fn get(&self, id: SiteId) -> Option<Site> {
        self.data.read().sites.iter().find(|s| s.id == id).cloned()
    }

    pub fn by_status(&self, status: SiteStatus) -> Vec<Site> {
        self.data
            .read()
            .sites
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect()
    }

    /// Sites flagged as illegal. Keys on the `illegal` flag, not on status.
    pub fn illegal_sites(&self) -> Vec<Site> {
        self.data
            .read()
            .sites
            .iter()
            .filter(|s| s.illegal)
            .cloned()
            .collect()
    }

    /// Register a new site.
    pub fn add(&self, site: Site) -> RegistryResult<()> {
        site.validate()
            .map_err(|reason| RegistryError::InvalidSite { reason })?;

        let mut data = self.data.write();
        if data.sites.iter().any(|s| s.id == site.id) {
            return Err(RegistryError::DuplicateId { id: site.id });
        }
        log::debug!("Registered site {} ({})", site.id, site.name);
        data.sites.push(site);
        Ok(())
    }

    /// Remove a site, clearing the selection if it pointed at the removed
    /// record.
    pub fn remove(&self, id: SiteId) -> RegistryResult<Site> {
        let mut data = self.data.write();
        let idx = data
            .sites
            .iter()
            .position(|s| s.id == id)
            .ok_or(RegistryError::NotFound { id })?;
        let site = data.sites.remove(idx);
        if data.selected == Some(id) {
            data.selected = None;
        }
        log::debug!("Removed site {} ({})", site.id, site.name);
        Ok(site)
    }

    /// Mark a site as the current selection.
    pub fn select(&self, id: SiteId) -> RegistryResult<Site> {
        let mut data = self.data.write();
        let site = data
            .sites
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(RegistryError::NotFound { id })?;
        data.selected = Some(id);
        Ok(site)
    }

    pub fn selected(&self) -> Option<Site> {
        let data = self.data.read();
        let id = data.selected?;
        data.sites.iter().find(|s| s.id == id).cloned()
    }

    /// Drop the current selection. Safe to call repeatedly.
    pub fn clear_selection(&self) {
        self.data.write().selected = None;
    }

    pub fn len(&self) -> usize {
        self.data.read().sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().sites.is_empty()
    }
}
