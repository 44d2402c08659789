//! Analysis services: derived metrics, spatial clustering, and the
//! orchestrated runs that feed the result store.

pub mod engine;
pub mod metrics;
pub mod reports;
pub mod results;
pub mod spatial;


pub use engine::{AnalysisEngine, DetectionSensitivity};
pub use metrics::{
    DamageEstimate, DamageLabel, EnvironmentalImpact, ImpactFactors, ImpactLevel,
};
pub use results::{
    AnalysisKind, AnalysisPayload, AnalysisRecord, BatchEntry, BatchImpact, ChangeReport,
    DetectionSummary, ResultStore, RunState, Trend, ViolationItem, ViolationReport,
    VolumeEstimate,
};
pub use spatial::SpatialSummary;
