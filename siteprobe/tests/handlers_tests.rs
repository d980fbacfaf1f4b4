use siteprobe::handlers::*;
use siteprobe_core::report::ReportFormat;
use siteprobe_core::{EntryStatus, PipelineError};
use siteprobe_scanner::{TlsVerification, WeakBodyPolicy};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn args_for(input: &TempDir, output: &TempDir) -> RunArgs {
    RunArgs {
        input: input.path().display().to_string(),
        output: output.path().display().to_string(),
        rate: 0.0,
        quiet: true,
        ..RunArgs::default()
    }
}

#[test]
fn test_resolve_dir_expands_tilde() {
    let resolved = resolve_dir("~/configs");
    assert!(!resolved.starts_with("~"));
    assert!(resolved.ends_with("configs"));
}

#[test]
fn test_resolve_dir_keeps_plain_paths() {
    assert_eq!(resolve_dir("./input"), PathBuf::from("./input"));
}

#[test]
fn test_default_args() {
    let args = RunArgs::default();
    assert_eq!(args.input, "./input");
    assert_eq!(args.output, "./output");
    assert_eq!(args.attempts, 3);
    assert_eq!(args.rate, 1.0);
    assert_eq!(args.format, ReportFormat::Text);
}

#[test]
fn test_build_probe_config_defaults() {
    let config = build_probe_config(&RunArgs::default()).unwrap();
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.tls, TlsVerification::Bypass);
    assert_eq!(config.weak_body, WeakBodyPolicy::Accept);
}

#[test]
fn test_build_probe_config_flags() {
    let args = RunArgs {
        attempts: 5,
        request_timeout_secs: 3,
        verify_tls: true,
        strict_body: true,
        ..RunArgs::default()
    };
    let config = build_probe_config(&args).unwrap();
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.request_timeout, Duration::from_secs(3));
    assert_eq!(config.tls, TlsVerification::Enforce);
    assert_eq!(config.weak_body, WeakBodyPolicy::Retry);
}

#[test]
fn test_build_probe_config_rejects_negative_delay() {
    let args = RunArgs {
        base_delay_secs: -1.0,
        ..RunArgs::default()
    };
    assert!(build_probe_config(&args).is_err());
}

#[test]
fn test_build_run_options() {
    let args = RunArgs {
        concurrency: 0,
        run_timeout_secs: Some(60),
        api_markers: vec!["/feed".to_string()],
        quiet: true,
        ..RunArgs::default()
    };
    let options = build_run_options(&args);
    assert_eq!(options.input_dir, PathBuf::from("./input"));
    assert_eq!(options.validate.concurrency, 1);
    assert_eq!(options.validate.api_markers, vec!["/feed".to_string()]);
    assert_eq!(options.run_timeout, Some(Duration::from_secs(60)));
    assert!(!options.show_progress_bars);
}

#[test]
fn test_build_run_options_keeps_default_markers() {
    let options = build_run_options(&RunArgs::default());
    assert_eq!(options.validate.api_markers, vec!["/api", "provide/vod"]);
}

#[test]
fn test_save_report_creates_parent_dirs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("reports/run.txt");

    save_report("hello", &path)?;

    assert_eq!(fs::read_to_string(path)?, "hello");
    Ok(())
}

#[tokio::test]
async fn test_handle_run_without_input_fails() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let err = handle_run(&args_for(&input, &output)).await.unwrap_err();

    let pipeline = err.downcast_ref::<PipelineError>().unwrap();
    assert!(pipeline.is_fatal());
}

#[tokio::test]
async fn test_handle_run_keeps_non_api_sites_without_probing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(
        input.path().join("config.json"),
        r#"{"cache_time": 60, "api_site": {"home": {"name": "Home", "api": "http://127.0.0.1:9/index.html"}}}"#,
    )
    .unwrap();
    let report_path = output.path().join("report.json");
    let args = RunArgs {
        format: ReportFormat::Json,
        report_file: Some(report_path.clone()),
        ..args_for(&input, &output)
    };

    let summary = handle_run(&args).await.unwrap();

    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.count(EntryStatus::Unprobed), 1);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.path().join("config.json")).unwrap())
            .unwrap();
    assert_eq!(written["cache_time"], 60);
    assert_eq!(written["api_site"]["home"]["name"], "Home");
    assert!(output.path().join("config_base58.txt").exists());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(report["report"]["totals"]["unprobed"], 1);
}
