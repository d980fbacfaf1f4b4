use anyhow::{Context, Result};
use clap::ArgMatches;
use siteprobe_core::report::{ReportFormat, generate_report};
use siteprobe_core::{PipelineError, RunOptions, RunSummary, ValidateOptions, execute_run};
use siteprobe_scanner::{
    HttpTransport, Pacer, ProbeConfig, Prober, RetryPolicy, TlsVerification, WeakBodyPolicy,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Settings for one validation run, as given on the command line.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub input: String,
    pub output: String,
    pub attempts: u32,
    pub base_delay_secs: f64,
    pub request_timeout_secs: u64,
    pub run_timeout_secs: Option<u64>,
    pub verify_tls: bool,
    pub strict_body: bool,
    pub concurrency: usize,
    pub rate: f64,
    /// Empty means the built-in markers.
    pub api_markers: Vec<String>,
    pub format: ReportFormat,
    pub report_file: Option<PathBuf>,
    pub quiet: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            input: "./input".to_string(),
            output: "./output".to_string(),
            attempts: 3,
            base_delay_secs: 1.0,
            request_timeout_secs: 10,
            run_timeout_secs: None,
            verify_tls: false,
            strict_body: false,
            concurrency: 1,
            rate: 1.0,
            api_markers: Vec::new(),
            format: ReportFormat::Text,
            report_file: None,
            quiet: false,
        }
    }
}

impl RunArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let defaults = Self::default();
        Self {
            input: matches
                .get_one::<String>("input")
                .cloned()
                .unwrap_or(defaults.input),
            output: matches
                .get_one::<String>("output")
                .cloned()
                .unwrap_or(defaults.output),
            attempts: matches
                .get_one::<u32>("attempts")
                .copied()
                .unwrap_or(defaults.attempts),
            base_delay_secs: matches
                .get_one::<f64>("base-delay")
                .copied()
                .unwrap_or(defaults.base_delay_secs),
            request_timeout_secs: matches
                .get_one::<u64>("timeout")
                .copied()
                .unwrap_or(defaults.request_timeout_secs),
            run_timeout_secs: matches.get_one::<u64>("run-timeout").copied(),
            verify_tls: matches.get_flag("verify-tls"),
            strict_body: matches.get_flag("strict-body"),
            concurrency: matches
                .get_one::<usize>("concurrency")
                .copied()
                .unwrap_or(defaults.concurrency),
            rate: matches
                .get_one::<f64>("rate")
                .copied()
                .unwrap_or(defaults.rate),
            api_markers: matches
                .get_many::<String>("api-marker")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            format: matches
                .get_one::<String>("format")
                .and_then(|f| ReportFormat::from_str(f))
                .unwrap_or(defaults.format),
            report_file: matches.get_one::<PathBuf>("report-file").cloned(),
            quiet: matches.get_flag("quiet"),
        }
    }
}

/// Expand a leading `~` in a directory argument
pub fn resolve_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn build_probe_config(args: &RunArgs) -> Result<ProbeConfig> {
    let retry = RetryPolicy::new(
        args.attempts,
        args.base_delay_secs,
        RetryPolicy::default().jitter,
    )
    .context("Invalid retry settings")?;

    Ok(ProbeConfig {
        retry,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
        tls: if args.verify_tls {
            TlsVerification::Enforce
        } else {
            TlsVerification::Bypass
        },
        weak_body: if args.strict_body {
            WeakBodyPolicy::Retry
        } else {
            WeakBodyPolicy::Accept
        },
        ..ProbeConfig::default()
    })
}

pub fn build_run_options(args: &RunArgs) -> RunOptions {
    let mut validate = ValidateOptions {
        concurrency: args.concurrency.max(1),
        ..ValidateOptions::default()
    };
    if !args.api_markers.is_empty() {
        validate.api_markers = args.api_markers.clone();
    }

    RunOptions {
        input_dir: resolve_dir(&args.input),
        output_dir: resolve_dir(&args.output),
        validate,
        show_progress_bars: !args.quiet,
        run_timeout: args.run_timeout_secs.map(Duration::from_secs),
    }
}

pub fn build_prober(args: &RunArgs) -> Result<Prober<HttpTransport>> {
    let config = build_probe_config(args)?;
    let prober = Prober::http(config).context("Failed to build HTTP client")?;
    Ok(prober.with_pacer(Arc::new(Pacer::per_second(args.rate))))
}

pub fn save_report(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write report to {}", path.display()))
}

/// Runs one validation pass and prints or saves its report.
///
/// Files that fail individually are part of the returned summary; an error
/// here means the run as a whole could not complete.
pub async fn handle_run(args: &RunArgs) -> Result<RunSummary> {
    let prober = build_prober(args)?;
    let options = build_run_options(args);

    info!(
        input = %options.input_dir.display(),
        output = %options.output_dir.display(),
        concurrency = options.validate.concurrency,
        rate = args.rate,
        "Starting validation run"
    );

    let summary = match execute_run(&options, &prober).await {
        Ok(summary) => summary,
        Err(PipelineError::Timeout { limit, partial }) => {
            // Files written before the limit are already on disk; report them.
            emit_report(&partial, args)?;
            return Err(PipelineError::Timeout { limit, partial })
                .with_context(|| format!("Validation of {} failed", options.input_dir.display()));
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Validation of {} failed", options.input_dir.display()));
        }
    };

    emit_report(&summary, args)?;
    Ok(summary)
}

fn emit_report(summary: &RunSummary, args: &RunArgs) -> Result<()> {
    let report = generate_report(summary, args.format).context("Failed to render report")?;
    match args.report_file {
        Some(ref path) => save_report(&report, path)?,
        None if !args.quiet => print!("{}", report),
        None => {}
    }
    Ok(())
}
