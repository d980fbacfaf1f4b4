// Validation pipeline: extract, probe, recompose and write each document

use crate::discover::{discover_inputs, output_paths};
use crate::encode::encode_base58;
use crate::error::{PipelineError, Result};
use crate::recompose::recompose;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use siteprobe_scanner::{
    ConfigShape, EndpointCandidate, ProbeVerdict, Prober, Transport, extract_with_shape,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// URL fragments that mark an endpoint as a probe-able API.
pub const DEFAULT_API_MARKERS: &[&str] = &["/api", "provide/vod"];

/// Callback invoked once per entry as soon as its status is known
pub type EntryProgressCallback = Arc<dyn Fn(&EndpointCandidate, EntryStatus) + Send + Sync>;

/// Options for validating a single document
#[derive(Clone)]
pub struct ValidateOptions {
    pub api_markers: Vec<String>,
    /// Candidates probed at once. 1 keeps the sequential behaviour.
    pub concurrency: usize,
    pub progress_callback: Option<EntryProgressCallback>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            api_markers: DEFAULT_API_MARKERS.iter().map(|m| m.to_string()).collect(),
            concurrency: 1,
            progress_callback: None,
        }
    }
}

/// Options for a whole batch run
#[derive(Clone)]
pub struct RunOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub validate: ValidateOptions,
    pub show_progress_bars: bool,
    pub run_timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            validate: ValidateOptions::default(),
            show_progress_bars: false,
            run_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Live,
    Dead,
    /// Not an API URL, kept without a network call.
    Unprobed,
    /// Disabled in the source document, kept as-is.
    Disabled,
}

impl EntryStatus {
    pub fn is_retained(self) -> bool {
        self != EntryStatus::Dead
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub id: String,
    pub name: String,
    pub url: String,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<ProbeVerdict>,
}

#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub shape: ConfigShape,
    pub output: Value,
    pub entries: Vec<EntryReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub encoded: PathBuf,
    pub shape: ConfigShape,
    pub entries: Vec<EntryReport>,
}

impl FileReport {
    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub input: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
}

impl RunSummary {
    pub fn count(&self, status: EntryStatus) -> usize {
        self.files.iter().map(|f| f.count(status)).sum()
    }
}

/// Whether a URL looks like one of this domain's API endpoints
pub fn is_api_like(url: &str, markers: &[String]) -> bool {
    let url = url.to_ascii_lowercase();
    markers
        .iter()
        .any(|marker| url.contains(&marker.to_ascii_lowercase()))
}

/// Validate one parsed document: every enabled, API-like candidate is probed and
/// dead ones are removed from the returned output document.
pub async fn validate_document<T: Transport>(
    document: &Value,
    prober: &Prober<T>,
    options: &ValidateOptions,
) -> DocumentReport {
    let extraction = extract_with_shape(document);
    info!(
        "Extracted {} candidate(s) from {} document",
        extraction.candidates.len(),
        extraction.shape
    );

    // Unordered so a candidate sleeping through its backoff does not hold the window.
    let mut indexed: Vec<(usize, EntryReport)> = stream::iter(extraction.candidates.iter().enumerate())
        .map(|(offset, candidate)| async move {
            let (status, verdict) = if !candidate.enabled {
                (EntryStatus::Disabled, None)
            } else if !is_api_like(&candidate.url, &options.api_markers) {
                (EntryStatus::Unprobed, None)
            } else {
                let verdict = prober.probe_candidate(candidate, offset).await;
                let status = if verdict.is_live() {
                    EntryStatus::Live
                } else {
                    EntryStatus::Dead
                };
                (status, Some(verdict))
            };

            if let Some(ref callback) = options.progress_callback {
                callback(candidate, status);
            }

            let entry = EntryReport {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                url: candidate.url.clone(),
                status,
                verdict,
            };
            (offset, entry)
        })
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await;

    indexed.sort_by_key(|(offset, _)| *offset);
    let entries: Vec<EntryReport> = indexed.into_iter().map(|(_, entry)| entry).collect();

    let keep: HashSet<String> = entries
        .iter()
        .filter(|entry| entry.status.is_retained())
        .map(|entry| entry.id.clone())
        .collect();

    DocumentReport {
        shape: extraction.shape,
        output: recompose(document, &extraction, &keep),
        entries,
    }
}

/// Serialize with four-space indentation, keeping non-ASCII text verbatim
pub fn to_pretty_json(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Read, validate and write one input file
pub async fn process_file<T: Transport>(
    input: &Path,
    output_dir: &Path,
    prober: &Prober<T>,
    options: &ValidateOptions,
) -> Result<FileReport> {
    let content = tokio::fs::read_to_string(input).await?;
    let document: Value =
        serde_json::from_str(&content).map_err(|source| PipelineError::ConfigParse {
            path: input.to_path_buf(),
            source,
        })?;

    let report = validate_document(&document, prober, options).await;
    if report.entries.is_empty() {
        return Err(PipelineError::ExtractionEmpty {
            path: input.to_path_buf(),
        });
    }

    let bytes = to_pretty_json(&report.output)?;
    let (output, encoded) = output_paths(input, output_dir);

    tokio::fs::create_dir_all(output_dir).await?;
    tokio::fs::write(&output, &bytes).await?;
    tokio::fs::write(&encoded, encode_base58(&bytes)).await?;

    info!("Wrote {} and {}", output.display(), encoded.display());

    Ok(FileReport {
        input: input.to_path_buf(),
        output,
        encoded,
        shape: report.shape,
        entries: report.entries,
    })
}

/// Execute a batch run over every document in the input directory.
///
/// Per-file failures are recorded and the batch continues; only missing input
/// and the overall run timeout abort the run.
pub async fn execute_run<T: Transport>(options: &RunOptions, prober: &Prober<T>) -> Result<RunSummary> {
    let started_at = Utc::now();
    let inputs = discover_inputs(&options.input_dir)?;

    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting validation...");
        Some(pb)
    } else {
        None
    };

    let mut validate = options.validate.clone();
    if let Some(ref pb) = progress_bar {
        let pb = pb.clone();
        let outer = validate.progress_callback.take();
        validate.progress_callback = Some(Arc::new(move |candidate: &EndpointCandidate, status: EntryStatus| {
            pb.set_message(format!("{:?}: {} ({})", status, candidate.name, candidate.url));
            if let Some(ref outer) = outer {
                outer(candidate, status);
            }
        }));
    }

    let mut files = Vec::new();
    let mut failures = Vec::new();

    let batch = async {
        for (idx, input) in inputs.iter().enumerate() {
            if let Some(ref pb) = progress_bar {
                pb.println(format!(
                    "Validating {}/{}: {}",
                    idx + 1,
                    inputs.len(),
                    input.display()
                ));
            }

            match process_file(input, &options.output_dir, prober, &validate).await {
                Ok(report) => files.push(report),
                Err(e) => {
                    warn!("Skipping {}: {}", input.display(), e);
                    failures.push(FileFailure {
                        input: input.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
    };

    let timed_out = match options.run_timeout {
        Some(limit) => tokio::time::timeout(limit, batch).await.err().map(|_| limit),
        None => {
            batch.await;
            None
        }
    };

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    let summary = RunSummary {
        started_at,
        finished_at: Utc::now(),
        input_dir: options.input_dir.clone(),
        output_dir: options.output_dir.clone(),
        files,
        failures,
    };

    if let Some(limit) = timed_out {
        warn!(
            written = summary.files.len(),
            skipped = summary.failures.len(),
            "Run timed out after {:?}",
            limit
        );
        return Err(PipelineError::Timeout {
            limit,
            partial: Box::new(summary),
        });
    }

    Ok(summary)
}
