// Tests for run report generation

use chrono::{TimeZone, Utc};
use siteprobe_core::report::{ReportFormat, generate_json_report, generate_report, generate_text_report};
use siteprobe_core::{EntryReport, EntryStatus, FileFailure, FileReport, RunSummary};
use siteprobe_scanner::{ConfigShape, LiveSignal, ProbeVerdict};
use std::path::PathBuf;

fn sample_summary() -> RunSummary {
    let entries = vec![
        EntryReport {
            id: "a".to_string(),
            name: "Alpha".to_string(),
            url: "https://good.test/api.php/provide/vod".to_string(),
            status: EntryStatus::Live,
            verdict: Some(ProbeVerdict::live(
                "a".to_string(),
                LiveSignal::Strong,
                1,
                200,
                None,
            )),
        },
        EntryReport {
            id: "b".to_string(),
            name: "Beta".to_string(),
            url: "https://dead.test/api.php/provide/vod".to_string(),
            status: EntryStatus::Dead,
            verdict: Some(ProbeVerdict::dead(
                "b".to_string(),
                3,
                None,
                Some("connection error: refused".to_string()),
            )),
        },
        EntryReport {
            id: "c".to_string(),
            name: "Gamma".to_string(),
            url: "https://x.test/home".to_string(),
            status: EntryStatus::Unprobed,
            verdict: None,
        },
    ];

    RunSummary {
        started_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        finished_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 15).unwrap(),
        input_dir: PathBuf::from("input"),
        output_dir: PathBuf::from("output"),
        files: vec![FileReport {
            input: PathBuf::from("input/config.json"),
            output: PathBuf::from("output/config.json"),
            encoded: PathBuf::from("output/config_base58.txt"),
            shape: ConfigShape::KeyedSites,
            entries,
        }],
        failures: vec![FileFailure {
            input: PathBuf::from("input/broken.json"),
            error: "Failed to parse input/broken.json: EOF".to_string(),
        }],
    }
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("csv"), None);
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_totals() {
    colored::control::set_override(false);
    let report = generate_text_report(&sample_summary());

    assert!(report.contains("SITEPROBE VALIDATION REPORT"));
    assert!(report.contains("Files written:  1"));
    assert!(report.contains("Files skipped:  1"));
    assert!(report.contains("Live:       1"));
    assert!(report.contains("Removed:    1"));
    assert!(report.contains("Unprobed:   1"));
    assert!(report.contains("Duration:     10.0 seconds"));
}

#[test]
fn test_text_report_entries() {
    colored::control::set_override(false);
    let report = generate_text_report(&sample_summary());

    assert!(report.contains("config.json -> config.json (keyed sites)"));
    assert!(report.contains("[LIVE] Alpha  https://good.test/api.php/provide/vod  (1 attempt, HTTP 200)"));
    assert!(report.contains("[DEAD] Beta  https://dead.test/api.php/provide/vod  (3 attempts, connection error: refused)"));
    assert!(report.contains("[SKIP] Gamma  https://x.test/home\n"));
}

#[test]
fn test_text_report_lists_skipped_files() {
    colored::control::set_override(false);
    let report = generate_text_report(&sample_summary());

    assert!(report.contains("SKIPPED FILES"));
    assert!(report.contains("broken.json: Failed to parse"));
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_structure() {
    let json = generate_json_report(&sample_summary()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let report = &value["report"];
    assert_eq!(report["metadata"]["generator"], "Siteprobe");
    assert_eq!(report["totals"]["live"], 1);
    assert_eq!(report["totals"]["removed"], 1);
    assert_eq!(report["totals"]["files_skipped"], 1);

    let entries = &report["run"]["files"][0]["entries"];
    assert_eq!(entries[0]["status"], "live");
    assert_eq!(entries[1]["verdict"]["outcome"], "dead");
    assert!(entries[2].get("verdict").is_none());
    assert_eq!(report["run"]["files"][0]["shape"], "keyed_sites");
}

#[test]
fn test_generate_report_dispatches_on_format() {
    let summary = sample_summary();
    let json = generate_report(&summary, ReportFormat::Json).unwrap();
    assert!(json.trim_start().starts_with('{'));

    colored::control::set_override(false);
    let text = generate_report(&summary, ReportFormat::Text).unwrap();
    assert!(text.contains("SITEPROBE VALIDATION REPORT"));
}
