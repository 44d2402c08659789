//! Human-readable analysis artifacts.
//!
//! Renders the notification texts and plain-text reports the front-end
//! shows verbatim. Wording, rulers and numbering are part of the product
//! surface, so changes here are user-visible.

use chrono::{DateTime, Utc};

use super::engine::DetectionSensitivity;
use super::results::{BatchImpact, ChangeReport, DetectionSummary, ViolationReport, VolumeEstimate};

const RULER_NARROW: usize = 40;
const RULER_WIDE: usize = 50;

fn timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn date_only(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Notification shown after a detection sweep.
pub fn detection_message(summary: &DetectionSummary, sensitivity: DetectionSensitivity) -> String {
    format!(
        "🔍 Mining Detection Complete!\n\n\
         ✅ {} new mining areas detected\n\
         ✅ {} active sites confirmed\n\
         ⚠️ {} potential violations identified\n\n\
         Total area analyzed: 2,450 km²\n\
         Processing time: 2.3 seconds\n\
         Sensitivity: {}",
        summary.new_sites,
        summary.active_sites,
        summary.violations,
        sensitivity.as_str().to_uppercase()
    )
}

/// Notification shown after a volume estimate.
pub fn volume_message(estimate: &VolumeEstimate, analyzed_at: DateTime<Utc>) -> String {
    format!(
        "📊 Volume Calculation for {}\n\n\
         Method: Digital Elevation Model (DEM) Analysis\n\n\
         Results:\n\
         • Total Volume: {} M m³\n\
         • Average Depth: {} m\n\
         • Max Depth: {:.1} m\n\
         • Min Depth: {:.1} m\n\
         • Surface Area: {} ha\n\n\
         Accuracy: ±5%\n\
         Confidence Level: {}%\n\n\
         Analysis Date: {}",
        estimate.site_name,
        estimate.total_volume_mcm,
        estimate.avg_depth_m,
        estimate.max_depth_m,
        estimate.min_depth_m,
        estimate.area_ha,
        estimate.accuracy_pct,
        date_only(analyzed_at)
    )
}

/// Notification shown when a temporal comparison is requested.
pub fn temporal_message(site_name: Option<&str>) -> String {
    format!(
        "📅 Temporal Analysis - {}\n\n\
         Select comparison parameters:\n\n\
         Time Period:\n\
         • Before: Previous satellite capture\n\
         • After: Current satellite capture\n\n\
         Analysis includes:\n\
         • Area change detection\n\
         • Volume difference calculation\n\
         • Vegetation index changes\n\
         • Activity pattern analysis\n\n\
         This will highlight changes in mining areas over time",
        site_name.unwrap_or("all sites")
    )
}

/// Full violation report, entries already sorted by priority.
pub fn violation_report_text(report: &ViolationReport, detected_at: DateTime<Utc>) -> String {
    let mut out = String::from("⚠️ ILLEGAL MINING DETECTION REPORT\n");
    out.push_str(&"=".repeat(RULER_NARROW));
    out.push_str("\n\n");
    out.push_str(&format!("Detection Date: {}\n", timestamp(detected_at)));
    out.push_str(&format!("Total Violations Found: {}\n\n", report.count));

    for (index, site) in report.sites.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, site.name));
        out.push_str(&format!("   Location: {}\n", site.location.display()));
        out.push_str(&format!("   Area: {} hectares\n", site.area_ha));
        out.push_str(&format!("   Type: {}\n", site.material));
        out.push_str(&format!("   Priority: {}/10\n", site.priority));
        out.push_str(&format!(
            "   Est. Environmental Damage: {}\n\n",
            site.damage.label
        ));
    }

    out.push_str("\nRECOMMENDATIONS:\n");
    out.push_str(&"-".repeat(RULER_NARROW));
    out.push('\n');
    out.push_str("1. Immediate field inspection required\n");
    out.push_str("2. Issue cease and desist notices\n");
    out.push_str("3. Environmental impact assessment\n");
    out.push_str("4. Legal action preparation\n");
    out.push_str("5. Monitor for continued activity\n\n");
    out.push_str("Report generated by ORENEXUS Mining Monitor");
    out
}

/// Batch assessment report, entries already sorted by impact score.
pub fn batch_report_text(batch: &BatchImpact, top: usize, analyzed_at: DateTime<Utc>) -> String {
    let mut out = String::from("📊 BATCH ANALYSIS REPORT\n");
    out.push_str(&"=".repeat(RULER_WIDE));
    out.push_str("\n\n");
    out.push_str(&format!("Total Sites Analyzed: {}\n", batch.entries.len()));
    out.push_str(&format!("Analysis Date: {}\n\n", timestamp(analyzed_at)));
    out.push_str(&format!("TOP {} SITES BY ENVIRONMENTAL IMPACT:\n", top));
    out.push_str(&"-".repeat(RULER_WIDE));
    out.push('\n');

    for (index, entry) in batch.entries.iter().take(top).enumerate() {
        out.push_str(&format!("\n{}. {}\n", index + 1, entry.name));
        out.push_str(&format!("   Impact Level: {}\n", entry.impact.level));
        out.push_str(&format!("   Impact Score: {:.2}\n", entry.impact.score));
        out.push_str(&format!(
            "   Area: {} ha | Volume: {} M m³\n",
            entry.area_ha, entry.volume_mcm
        ));
        out.push_str(&format!(
            "   Status: {}{}\n",
            entry.status.as_str().to_uppercase(),
            if entry.illegal { " (ILLEGAL)" } else { "" }
        ));
    }

    out
}

/// Simulated change summary between two captures.
pub fn change_report_text(change: &ChangeReport) -> String {
    format!(
        "📊 CHANGE DETECTION REPORT\n\
         {}\n\n\
         Site: {}\n\
         Period: {} to {}\n\n\
         Area Change: {:.2} ha\n\
         Volume Change: {:.2} M m³\n\
         Activity Level: {}\n\
         Vegetation Loss: {:.1}%",
        "=".repeat(RULER_NARROW),
        change.site_name,
        change.period_start,
        change.period_end,
        change.area_change_ha,
        change.volume_change_mcm,
        change.activity,
        change.vegetation_loss_pct
    )
}
