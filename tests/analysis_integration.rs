//! End-to-end tests of the analysis runs over the bundled dataset,
//! wired to recording collaborators with zero latency and fixed noise.

mod support;

use chrono::NaiveDate;
use orenexus::analysis::results::{AnalysisKind, AnalysisPayload, RunState, Trend};
use orenexus::api::{SiteId, SiteStatus};
use orenexus::export::ExportFormat;
use orenexus::ui::Severity;
use support::{engine_with_sites, sample_engine, test_site};

#[tokio::test]
async fn test_detection_run_over_sample_data() {
    let t = sample_engine(vec![0.5]);

    let summary = t.engine.run_detection().await;

    assert_eq!(summary.new_sites, 2);
    assert_eq!(summary.active_sites, 6);
    assert_eq!(summary.violations, 2);
    assert!((summary.total_area_ha - 91.8).abs() < 1e-9);

    let (severity, message) = t.notifier.last().unwrap();
    assert_eq!(severity, Severity::Success);
    assert!(message.contains("2 new mining areas detected"));
    assert!(message.contains("6 active sites confirmed"));
    assert!(message.contains("Sensitivity: MEDIUM"));

    assert_eq!(t.loading.show_labels(), vec!["Detecting mining areas"]);
    assert_eq!(t.loading.hide_count(), 1);

    assert_eq!(t.engine.state(AnalysisKind::Detection), RunState::Completed);
    let record = t.engine.results(AnalysisKind::Detection).unwrap();
    assert_eq!(record.kind, AnalysisKind::Detection);
    assert!(matches!(record.payload, AnalysisPayload::Detection(_)));
}

#[tokio::test]
async fn test_detection_new_site_count_spans_one_to_three() {
    let low = sample_engine(vec![0.0]);
    assert_eq!(low.engine.run_detection().await.new_sites, 1);

    let high = sample_engine(vec![0.999]);
    assert_eq!(high.engine.run_detection().await.new_sites, 3);
}

#[tokio::test]
async fn test_volume_requires_selection() {
    let t = sample_engine(vec![0.5]);

    let estimate = t.engine.estimate_volume().await;

    assert!(estimate.is_none());
    assert_eq!(
        t.notifier.last(),
        Some((
            Severity::Warning,
            "Please select a mining site first".to_string()
        ))
    );
    // soft failure: no loading, no record, state untouched
    assert_eq!(t.loading.show_count(), 0);
    assert!(t.engine.results(AnalysisKind::Volume).is_none());
    assert_eq!(t.engine.state(AnalysisKind::Volume), RunState::Idle);
}

#[tokio::test]
async fn test_volume_for_selected_site() {
    let t = sample_engine(vec![0.5]);
    t.registry.select(SiteId::new(4)).unwrap();

    let estimate = t.engine.estimate_volume().await.unwrap();

    assert_eq!(estimate.site_id, SiteId::new(4));
    assert_eq!(estimate.site_name, "Illegal Sand Mining Site");
    assert_eq!(estimate.total_volume_mcm, 0.2);
    assert_eq!(estimate.avg_depth_m, 12.3);
    assert_eq!(estimate.max_depth_m, 22.1);
    assert_eq!(estimate.min_depth_m, 7.4);
    assert_eq!(estimate.accuracy_pct, 95);

    let (severity, message) = t.notifier.last().unwrap();
    assert_eq!(severity, Severity::Info);
    assert!(message.contains("Volume Calculation for Illegal Sand Mining Site"));
    assert!(message.contains("• Max Depth: 22.1 m"));
    assert!(message.contains("Confidence Level: 95%"));

    assert_eq!(t.loading.show_labels(), vec!["Calculating volume"]);
    assert_eq!(t.loading.hide_count(), 1);
    assert_eq!(t.engine.state(AnalysisKind::Volume), RunState::Completed);
}

#[tokio::test]
async fn test_illegal_sweep_report_and_pulses() {
    let t = sample_engine(vec![0.5]);

    let report = t.engine.run_illegal_sweep().await;

    assert_eq!(report.count, 2);
    // equal priorities keep registry order
    assert_eq!(report.sites[0].id, SiteId::new(4));
    assert_eq!(report.sites[1].id, SiteId::new(7));
    assert_eq!(report.sites[0].priority, 6);
    assert_eq!(report.sites[1].priority, 6);

    let (severity, message) = t.notifier.last().unwrap();
    assert_eq!(severity, Severity::Warning);
    assert!(message.contains("ILLEGAL MINING DETECTION REPORT"));
    assert!(message.contains("Total Violations Found: 2"));
    assert!(message.contains("1. Illegal Sand Mining Site"));
    assert!(message.contains("2. Illegal Quarry Site"));

    assert_eq!(
        t.map.pulses.lock().clone(),
        vec![SiteId::new(4), SiteId::new(7)]
    );
    assert_eq!(t.loading.show_labels(), vec!["Scanning for illegal activity"]);
    assert_eq!(t.loading.hide_count(), 1);
}

#[tokio::test]
async fn test_illegal_sweep_orders_by_priority() {
    // one large coal operation outranks two small sand pits
    let sites = vec![
        test_site(1, 10.0, 70.0, SiteStatus::Illegal, true, 1.0, 5.0, 0.1),
        test_site(2, 12.0, 72.0, SiteStatus::Illegal, true, 9.0, 40.0, 2.0),
        test_site(3, 14.0, 74.0, SiteStatus::Illegal, true, 1.5, 6.0, 0.2),
    ];
    let t = engine_with_sites(sites, vec![0.5]);

    let report = t.engine.run_illegal_sweep().await;

    assert_eq!(report.count, 3);
    assert_eq!(report.sites[0].id, SiteId::new(2));
    // area 9 > 5 and volume 2 > 1
    assert_eq!(report.sites[0].priority, 9);
}

#[tokio::test]
async fn test_batch_assessment_ranks_by_impact() {
    let t = sample_engine(vec![0.5]);

    let batch = t.engine.run_batch_assessment().await;

    assert_eq!(batch.entries.len(), 10);
    assert_eq!(batch.entries[0].id, SiteId::new(8));
    assert_eq!(batch.entries[0].impact.score, 9.57);
    assert_eq!(
        batch.entries[0].impact.level,
        orenexus::analysis::metrics::ImpactLevel::High
    );
    assert_eq!(batch.entries[9].id, SiteId::new(7));

    let (severity, message) = t.notifier.last().unwrap();
    assert_eq!(severity, Severity::Info);
    assert!(message.contains("BATCH ANALYSIS REPORT"));
    assert!(message.contains("Total Sites Analyzed: 10"));
    assert!(message.contains("TOP 5 SITES BY ENVIRONMENTAL IMPACT"));
    assert!(message.contains("1. Singareni Coal Mine"));

    assert_eq!(t.loading.show_labels(), vec!["Analyzing all sites"]);
    assert_eq!(t.loading.hide_count(), 1);
}

#[tokio::test]
async fn test_result_slots_overwrite_per_kind() {
    let t = sample_engine(vec![0.0, 0.999]);

    let first = t.engine.run_detection().await;
    assert_eq!(first.new_sites, 1);

    let second = t.engine.run_detection().await;
    assert_eq!(second.new_sites, 3);

    let results = t.engine.all_results();
    assert_eq!(results.len(), 1);
    match &results[&AnalysisKind::Detection].payload {
        AnalysisPayload::Detection(summary) => assert_eq!(summary.new_sites, 3),
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[tokio::test]
async fn test_sensitivity_changes_detection_message() {
    let t = sample_engine(vec![0.5]);
    t.engine
        .set_sensitivity(orenexus::analysis::DetectionSensitivity::High);

    t.engine.run_detection().await;

    let (_, message) = t.notifier.last().unwrap();
    assert!(message.contains("Sensitivity: HIGH"));
}

#[tokio::test]
async fn test_temporal_preview_names_selection() {
    let t = sample_engine(vec![0.5]);

    t.engine.temporal_preview();
    let (_, message) = t.notifier.last().unwrap();
    assert!(message.contains("all sites"));

    t.registry.select(SiteId::new(1)).unwrap();
    t.engine.temporal_preview();
    let (_, message) = t.notifier.last().unwrap();
    assert!(message.contains("Jharia Coal Mine"));
}

#[test]
fn test_change_report_is_noise_driven() {
    let t = sample_engine(vec![0.5, 0.5, 0.5, 0.5]);
    let site = t.registry.get(SiteId::new(1)).unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    let change = t.engine.change_report(&site, start, end);

    assert_eq!(change.site_name, "Jharia Coal Mine");
    assert_eq!(change.area_change_ha, 0.0);
    assert_eq!(change.volume_change_mcm, 0.0);
    assert_eq!(change.activity, Trend::Decreased);
    assert_eq!(change.vegetation_loss_pct, 15.0);
}

#[tokio::test]
async fn test_runs_are_deterministic_with_scripted_noise() {
    let script = vec![0.62, 0.9, 0.1, 0.3, 0.8];
    let a = sample_engine(script.clone());
    let b = sample_engine(script);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let summary_a = a.engine.run_detection().await;
    let summary_b = b.engine.run_detection().await;
    assert_eq!(summary_a, summary_b);

    let site = a.registry.get(SiteId::new(2)).unwrap();
    assert_eq!(
        a.engine.change_report(&site, start, end),
        b.engine.change_report(&site, start, end)
    );

    let sweep_a = a.engine.run_illegal_sweep().await;
    let sweep_b = b.engine.run_illegal_sweep().await;
    assert_eq!(sweep_a, sweep_b);
}

#[tokio::test]
async fn test_export_dataset_flow() {
    let t = sample_engine(vec![0.5]);

    let filename = t.engine.export_dataset(ExportFormat::GeoJson).await;

    assert!(filename.starts_with("ORENEXUS_Mining_Data_"));
    assert!(filename.ends_with(".geojson"));

    let (severity, message) = t.notifier.last().unwrap();
    assert_eq!(severity, Severity::Success);
    assert!(message.contains("✅ Export Successful!"));
    assert!(message.contains("Format: GeoJSON"));
    assert!(message.contains(&filename));

    assert_eq!(t.loading.show_labels(), vec!["Preparing export"]);
    assert_eq!(t.loading.hide_count(), 1);
}

#[test]
fn test_spatial_summary_sample_data_has_no_clusters() {
    // the bundled sites are spread hundreds of kilometres apart
    let t = sample_engine(vec![0.5]);

    let summary = t.engine.spatial_summary();

    assert_eq!(summary.total_sites, 10);
    assert_eq!(summary.cluster_count, 0);
    assert!((summary.total_area_ha - 91.8).abs() < 1e-9);
    assert!((summary.average_area_ha - 9.18).abs() < 1e-9);
    assert!(summary.average_distance_deg > 0.0);
}

#[tokio::test]
async fn test_states_stay_idle_until_their_run() {
    let t = sample_engine(vec![0.5]);

    for kind in [
        AnalysisKind::Detection,
        AnalysisKind::Volume,
        AnalysisKind::Illegal,
        AnalysisKind::BatchAnalysis,
    ] {
        assert_eq!(t.engine.state(kind), RunState::Idle);
    }

    t.engine.run_illegal_sweep().await;

    assert_eq!(t.engine.state(AnalysisKind::Illegal), RunState::Completed);
    assert_eq!(t.engine.state(AnalysisKind::Detection), RunState::Idle);
    assert_eq!(t.engine.state(AnalysisKind::BatchAnalysis), RunState::Idle);
}

#[tokio::test]
async fn test_results_export_after_runs() {
    let t = sample_engine(vec![0.5]);
    t.engine.run_detection().await;
    t.engine.run_batch_assessment().await;

    let json = t.engine.export_results_json().unwrap();
    assert!(json.contains("\"detection\""));
    assert!(json.contains("\"batchAnalysis\""));

    let csv = t.engine.export_results_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Analysis Type,Timestamp,Details");
    assert_eq!(lines.len(), 3);
    // rows are ordered by kind label
    assert!(lines[1].starts_with("batchAnalysis,"));
    assert!(lines[2].starts_with("detection,"));
}
