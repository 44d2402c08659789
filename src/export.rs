//! Report generation and dataset export.
//!
//! The activity report and the result dumps are plain strings; the
//! GeoJSON builder is the one real serialization surface. Export runs
//! themselves are simulated, so [`export_filename`] only names the file
//! a download would produce.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::analysis::metrics;
use crate::analysis::results::{AnalysisKind, AnalysisRecord};
use crate::api::{Site, SiteStatus};

/// Export formats offered by the demonstrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GeoJson,
    Kml,
    Shapefile,
    Csv,
    PdfReport,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::GeoJson,
        ExportFormat::Kml,
        ExportFormat::Shapefile,
        ExportFormat::Csv,
        ExportFormat::PdfReport,
    ];

    /// Display name as shown in the export menu.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "GeoJSON",
            ExportFormat::Kml => "KML",
            ExportFormat::Shapefile => "Shapefile",
            ExportFormat::Csv => "CSV",
            ExportFormat::PdfReport => "PDF Report",
        }
    }

    /// File extension for the generated filename.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Kml => "kml",
            ExportFormat::Shapefile => "shapefile",
            ExportFormat::Csv => "csv",
            ExportFormat::PdfReport => "pdf",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "geojson" => Ok(ExportFormat::GeoJson),
            "kml" => Ok(ExportFormat::Kml),
            "shapefile" => Ok(ExportFormat::Shapefile),
            "csv" => Ok(ExportFormat::Csv),
            "pdf report" | "pdf" => Ok(ExportFormat::PdfReport),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}

fn timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Filename an export run would produce, stamped with unix millis.
pub fn export_filename(format: ExportFormat, ts: DateTime<Utc>) -> String {
    format!(
        "ORENEXUS_Mining_Data_{}.{}",
        ts.timestamp_millis(),
        format.extension()
    )
}

/// Full-text activity report over the current site list.
pub fn activity_report(sites: &[Site], generated: DateTime<Utc>) -> String {
    let inactive = sites
        .iter()
        .filter(|s| s.status == SiteStatus::Inactive)
        .count();

    let mut report = format!("ORENEXUS MINING ACTIVITY REPORT\n{}\n", "=".repeat(40));
    report.push_str(&format!("Generated: {}\n\n", timestamp(generated)));
    report.push_str(&format!("EXECUTIVE SUMMARY\n{}\n", "-".repeat(20)));
    report.push_str(&format!("Total Sites Monitored: {}\n", sites.len()));
    report.push_str(&format!(
        "Active Mining Sites: {}\n",
        metrics::active_count(sites)
    ));
    report.push_str(&format!("Inactive Sites: {}\n", inactive));
    report.push_str(&format!(
        "Illegal Operations: {}\n\n",
        metrics::violation_count(sites)
    ));

    report.push_str(&format!("DETAILED SITE LIST\n{}\n", "-".repeat(20)));
    for site in sites {
        report.push_str(&format!("\n{}\n", site.name));
        report.push_str(&format!("  Status: {}\n", site.status.as_str().to_uppercase()));
        report.push_str(&format!("  Type: {}\n", site.material));
        report.push_str(&format!(
            "  Area: {} ha | Volume: {} M m³\n",
            site.area_ha, site.volume_mcm
        ));
    }

    report.push_str(&format!("\n\nRECOMMENDATIONS\n{}\n", "-".repeat(20)));
    report.push_str("1. Immediate inspection of illegal sites\n");
    report.push_str("2. Environmental impact assessment needed\n");
    report.push_str("3. Update compliance documentation\n");

    report
}

fn ordered(
    results: &HashMap<AnalysisKind, AnalysisRecord>,
) -> BTreeMap<&'static str, &AnalysisRecord> {
    results
        .iter()
        .map(|(kind, record)| (kind.as_str(), record))
        .collect()
}

/// All stored analysis results as pretty JSON, keyed by kind.
pub fn results_json(results: &HashMap<AnalysisKind, AnalysisRecord>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ordered(results))
}

/// All stored analysis results as CSV, one row per kind. The details
/// column holds the record JSON, quoted.
pub fn results_csv(results: &HashMap<AnalysisKind, AnalysisRecord>) -> serde_json::Result<String> {
    let mut csv = String::from("Analysis Type,Timestamp,Details\n");
    for (key, record) in ordered(results) {
        let details = serde_json::to_string(record)?;
        csv.push_str(&format!(
            "{},{},{}\n",
            key,
            record.generated_at.to_rfc3339(),
            csv_quote(&details)
        ));
    }
    Ok(csv)
}

/// Quote a CSV field, doubling embedded quotes.
pub fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Site list as a GeoJSON FeatureCollection. Boundary rings are closed,
/// coordinates ordered `[longitude, latitude]`.
pub fn sites_geojson(sites: &[Site]) -> serde_json::Result<String> {
    let features: Vec<serde_json::Value> = sites
        .iter()
        .map(|site| {
            let mut ring: Vec<[f64; 2]> = site
                .boundary
                .iter()
                .map(|p| [p.longitude, p.latitude])
                .collect();
            if let Some(first) = ring.first().copied() {
                if ring.last() != Some(&first) {
                    ring.push(first);
                }
            }
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [ring],
                },
                "properties": {
                    "id": site.id.value(),
                    "name": site.name,
                    "status": site.status.as_str(),
                    "area": site.area_ha,
                    "depth": site.depth_m,
                    "volume": site.volume_mcm,
                    "type": site.material,
                    "operator": site.operator,
                    "illegal": site.illegal,
                },
            })
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::results::{AnalysisPayload, DetectionSummary};
    use crate::api::{GeoPoint, SiteId};
    use chrono::TimeZone;

    fn report_site(id: i64, name: &str, status: SiteStatus, illegal: bool) -> Site {
        Site {
            id: SiteId::new(id),
            name: name.to_string(),
            location: GeoPoint::new(23.0, 86.0).unwrap(),
            status,
            area_ha: 18.4,
            depth_m: 45.0,
            volume_mcm: 2.5,
            material: "Coal".to_string(),
            operator: "Test Mining Ltd.".to_string(),
            illegal,
            boundary: vec![
                GeoPoint::new(23.0, 86.0).unwrap(),
                GeoPoint::new(23.1, 86.0).unwrap(),
                GeoPoint::new(23.1, 86.1).unwrap(),
            ],
        }
    }

    #[test]
    fn test_format_names_and_extensions() {
        assert_eq!(ExportFormat::GeoJson.to_string(), "GeoJSON");
        assert_eq!(ExportFormat::PdfReport.to_string(), "PDF Report");
        assert_eq!(ExportFormat::GeoJson.extension(), "geojson");
        assert_eq!(ExportFormat::PdfReport.extension(), "pdf");
    }

    #[test]
    fn test_format_parse_case_insensitive() {
        assert_eq!("geojson".parse::<ExportFormat>().unwrap(), ExportFormat::GeoJson);
        assert_eq!("KML".parse::<ExportFormat>().unwrap(), ExportFormat::Kml);
        assert_eq!(
            "PDF Report".parse::<ExportFormat>().unwrap(),
            ExportFormat::PdfReport
        );
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_filename() {
        let ts = chrono::Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();
        let name = export_filename(ExportFormat::Csv, ts);
        assert_eq!(name, format!("ORENEXUS_Mining_Data_{}.csv", ts.timestamp_millis()));
    }

    #[test]
    fn test_activity_report_sections() {
        let sites = vec![
            report_site(1, "Jharia Coal Mines", SiteStatus::Active, false),
            report_site(2, "Closed Pit", SiteStatus::Inactive, false),
            report_site(3, "Unnamed Operation", SiteStatus::Illegal, true),
        ];
        let ts = chrono::Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();
        let report = activity_report(&sites, ts);

        assert!(report.starts_with("ORENEXUS MINING ACTIVITY REPORT\n"));
        assert!(report.contains("Generated: 2024-03-15 10:30:00"));
        assert!(report.contains("Total Sites Monitored: 3"));
        assert!(report.contains("Active Mining Sites: 1"));
        assert!(report.contains("Inactive Sites: 1"));
        assert!(report.contains("Illegal Operations: 1"));
        assert!(report.contains("\nJharia Coal Mines\n  Status: ACTIVE\n  Type: Coal\n"));
        assert!(report.contains("  Area: 18.4 ha | Volume: 2.5 M m³\n"));
        assert!(report.contains("1. Immediate inspection of illegal sites"));
    }

    #[test]
    fn test_results_csv_quotes_details() {
        let mut results = HashMap::new();
        let record = AnalysisRecord::new(
            AnalysisKind::Detection,
            AnalysisPayload::Detection(DetectionSummary {
                new_sites: 2,
                active_sites: 6,
                violations: 2,
                total_area_ha: 91.8,
            }),
        );
        results.insert(AnalysisKind::Detection, record.clone());

        let csv = results_csv(&results).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Analysis Type,Timestamp,Details"));

        let row = lines.next().unwrap();
        assert!(row.starts_with(&format!("detection,{},\"", record.generated_at.to_rfc3339())));
        // embedded quotes are doubled, so the row still has exactly
        // two unescaped field delimiters before the details column
        assert!(row.ends_with('"'));
        assert!(row.contains("\"\"new_sites\"\":2"));
    }

    #[test]
    fn test_results_json_is_keyed_by_kind() {
        let mut results = HashMap::new();
        results.insert(
            AnalysisKind::BatchAnalysis,
            AnalysisRecord::new(
                AnalysisKind::BatchAnalysis,
                AnalysisPayload::Batch(crate::analysis::results::BatchImpact {
                    entries: vec![],
                }),
            ),
        );
        let json = results_json(&results).unwrap();
        assert!(json.contains("\"batchAnalysis\""));
    }

    #[test]
    fn test_csv_quote() {
        assert_eq!(csv_quote("plain"), "\"plain\"");
        assert_eq!(csv_quote("a \"b\" c"), "\"a \"\"b\"\" c\"");
    }

    #[test]
    fn test_sites_geojson_closes_ring() {
        let sites = vec![report_site(1, "Ring Site", SiteStatus::Active, false)];
        let geojson = sites_geojson(&sites).unwrap();
        let value: serde_json::Value = serde_json::from_str(&geojson).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        let ring = &value["features"][0]["geometry"]["coordinates"][0];
        let points = ring.as_array().unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points.first(), points.last());
        // GeoJSON ordering is [lon, lat]
        assert_eq!(points[0][0], 86.0);
        assert_eq!(points[0][1], 23.0);
        assert_eq!(value["features"][0]["properties"]["name"], "Ring Site");
    }
}
