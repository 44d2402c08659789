//! Analysis result records.
//!
//! Each analysis kind owns a single overwritable slot: re-running a kind
//! replaces its previous record. The store is a cheap-clone handle shared
//! between the engine and whichever front-end wants to inspect results.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::metrics::{DamageEstimate, EnvironmentalImpact};
use crate::api::{GeoPoint, SiteId, SiteStatus};

/// The analysis operations the monitor can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisKind {
    Detection,
    Volume,
    Illegal,
    BatchAnalysis,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Detection => "detection",
            AnalysisKind::Volume => "volume",
            AnalysisKind::Illegal => "illegal",
            AnalysisKind::BatchAnalysis => "batchAnalysis",
        }
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of one analysis kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Completed,
}

/// Outcome of a detection sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSummary {
    /// Newly spotted sites, always between 1 and 3 in the demonstrator.
    pub new_sites: u32,
    pub active_sites: usize,
    pub violations: usize,
    pub total_area_ha: f64,
}

/// Volume breakdown for the selected site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeEstimate {
    pub site_id: SiteId,
    pub site_name: String,
    pub total_volume_mcm: f64,
    pub avg_depth_m: f64,
    pub max_depth_m: f64,
    pub min_depth_m: f64,
    pub area_ha: f64,
    pub accuracy_pct: u8,
}

/// One illegal site in a violation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationItem {
    pub id: SiteId,
    pub name: String,
    pub location: GeoPoint,
    pub area_ha: f64,
    pub material: String,
    pub damage: DamageEstimate,
    pub priority: u8,
}

/// Outcome of an illegal-activity sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationReport {
    pub count: usize,
    /// Sorted by priority descending; ties keep registry order.
    pub sites: Vec<ViolationItem>,
}

/// One site's assessment inside a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub id: SiteId,
    pub name: String,
    pub status: SiteStatus,
    pub area_ha: f64,
    pub volume_mcm: f64,
    pub impact: EnvironmentalImpact,
    pub illegal: bool,
}

/// Outcome of a batch assessment over every site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchImpact {
    /// Sorted by impact score descending.
    pub entries: Vec<BatchEntry>,
}

/// Direction of activity between two captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Increased,
    Decreased,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Trend::Increased => "Increased",
            Trend::Decreased => "Decreased",
        };
        write!(f, "{}", s)
    }
}

/// Simulated change summary between two capture dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub site_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub area_change_ha: f64,
    pub volume_change_mcm: f64,
    pub activity: Trend,
    pub vegetation_loss_pct: f64,
    pub generated_at: DateTime<Utc>,
}

/// Payload of a stored analysis record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    Detection(DetectionSummary),
    Volume(VolumeEstimate),
    Illegal(ViolationReport),
    Batch(BatchImpact),
}

impl AnalysisPayload {
    pub fn as_detection(&self) -> Option<&DetectionSummary> {
        match self {
            AnalysisPayload::Detection(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_volume(&self) -> Option<&VolumeEstimate> {
        match self {
            AnalysisPayload::Volume(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_illegal(&self) -> Option<&ViolationReport> {
        match self {
            AnalysisPayload::Illegal(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_batch(&self) -> Option<&BatchImpact> {
        match self {
            AnalysisPayload::Batch(b) => Some(b),
            _ => None,
        }
    }
}

/// One completed analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub kind: AnalysisKind,
    pub generated_at: DateTime<Utc>,
    pub payload: AnalysisPayload,
}

impl AnalysisRecord {
    pub fn new(kind: AnalysisKind, payload: AnalysisPayload) -> Self {
        Self {
            kind,
            generated_at: Utc::now(),
            payload,
        }
    }
}

/// In-memory store of the latest record per analysis kind.
#[derive(Clone, Default)]
pub struct ResultStore {
    data: Arc<RwLock<StoreData>>,
}

#[derive(Default)]
struct StoreData {
    results: HashMap<AnalysisKind, AnalysisRecord>,
    states: HashMap<AnalysisKind, RunState>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state of a kind. Kinds never run are `Idle`.
    pub fn state(&self, kind: AnalysisKind) -> RunState {
        self.data
            .read()
            .states
            .get(&kind)
            .copied()
            .unwrap_or(RunState::Idle)
    }

    /// Mark a kind as in flight.
    pub fn mark_running(&self, kind: AnalysisKind) {
        self.data.write().states.insert(kind, RunState::Running);
    }

    /// Store a completed record, replacing any previous one of that kind.
    pub fn store(&self, record: AnalysisRecord) {
        let mut data = self.data.write();
        log::debug!("Storing {} analysis result", record.kind);
        data.states.insert(record.kind, RunState::Completed);
        data.results.insert(record.kind, record);
    }

    pub fn get(&self, kind: AnalysisKind) -> Option<AnalysisRecord> {
        self.data.read().results.get(&kind).cloned()
    }

    /// Snapshot of every stored record.
    pub fn snapshot(&self) -> HashMap<AnalysisKind, AnalysisRecord> {
        self.data.read().results.clone()
    }

    /// Drop all records and reset every kind to `Idle`.
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.results.clear();
        data.states.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.read().results.len()
    }
}
