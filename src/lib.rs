//! # ORENEXUS Mining Monitor
//!
//! Core engine of the ORENEXUS mining-site monitoring demonstrator.
//!
//! This crate models a fixed survey region of open-pit mining sites and
//! the analyses an inspector runs over them: detection sweeps, volume
//! estimation, illegal-operation reports, and batch environmental
//! assessment. All sensing is simulated; numbers derive from the bundled
//! dataset plus an injectable noise source, so every run is reproducible
//! under test.
//!
//! ## Features
//!
//! - **Site Registry**: Shared in-memory store of mining sites with a
//!   single selection slot
//! - **Derived Metrics**: Damage estimates, priority scores, and
//!   environmental impact as pure functions
//! - **Spatial Clustering**: Seed-greedy proximity clustering in planar
//!   degree space
//! - **Analysis Runs**: Orchestrated detection, volume, illegal, and
//!   batch runs with simulated latency and per-kind result slots
//! - **Overlays**: Legal-boundary rectangles and an activity heatmap
//! - **Reports & Export**: Notification texts, the activity report, and
//!   GeoJSON/CSV/JSON dataset dumps
//!
//! ## Architecture
//!
//! - [`api`]: Core domain types
//! - [`config`]: TOML configuration with layered defaults
//! - [`dataset`]: Site dataset ingestion
//! - [`registry`]: The shared site store
//! - [`analysis`]: Metrics, clustering, result store, and the engine
//! - [`overlay`]: Map overlay computation
//! - [`export`]: Report generation and dataset export
//! - [`ui`]: Front-end collaborator traits and headless defaults
//! - [`monitor`]: Top-level context, builder, and startup sequence
//!

pub mod api;

pub mod config;
pub mod dataset;

pub mod analysis;
pub mod export;
pub mod overlay;
pub mod registry;

pub mod latency;
pub mod sampling;
pub mod ui;

pub mod monitor;
