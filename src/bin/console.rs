//! ORENEXUS console demonstrator.
//!
//! Walks the full analysis surface once: loads the bundled dataset,
//! runs every analysis, and prints each notification to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin orenexus-console
//!
//! # With an explicit config file
//! ORENEXUS_CONFIG=config/orenexus.toml cargo run --bin orenexus-console
//! ```
//!
//! # Environment Variables
//!
//! - `ORENEXUS_CONFIG`: Path to a TOML config file (default: search the
//!   usual locations, then fall back to built-in defaults)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use orenexus::api::SiteId;
use orenexus::export::ExportFormat;
use orenexus::monitor::MiningMonitor;
use orenexus::ui::{LoadingIndicator, Notifier, Severity};

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        let tag = match severity {
            Severity::Info => "INFO",
            Severity::Success => " OK ",
            Severity::Warning => "WARN",
            Severity::Error => "FAIL",
        };
        println!("\n[{}] {}\n", tag, message);
    }
}

struct ConsoleLoading;

impl LoadingIndicator for ConsoleLoading {
    fn show(&self, label: &str) {
        println!("... {}", label);
    }

    fn hide(&self) {}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .init();

    info!("Starting ORENEXUS Mining Monitor");

    let mut builder = MiningMonitor::builder()
        .with_notifier(Arc::new(ConsoleNotifier))
        .with_loading(Arc::new(ConsoleLoading));
    if let Ok(path) = env::var("ORENEXUS_CONFIG") {
        builder = builder.from_config_file(path);
    }
    let monitor = builder.build()?;

    monitor.init()?;
    info!("Initial stats: {}", monitor.stats());

    let engine = monitor.engine();

    engine.run_detection().await;

    monitor.select_site(SiteId::new(4))?;
    engine.estimate_volume().await;

    engine.run_illegal_sweep().await;
    engine.run_batch_assessment().await;

    let spatial = engine.spatial_summary();
    info!(
        "Spatial summary: {} clusters across {} sites, average distance {:.2}°",
        spatial.cluster_count, spatial.total_sites, spatial.average_distance_deg
    );

    engine.temporal_preview();

    monitor.show_legal_boundaries();
    monitor.show_heatmap();

    monitor.generate_report();
    engine.export_dataset(ExportFormat::GeoJson).await;

    info!("Stored analysis results:\n{}", engine.export_results_json()?);

    Ok(())
}
