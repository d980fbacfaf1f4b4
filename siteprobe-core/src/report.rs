// Run report generation

use crate::pipeline::{EntryReport, EntryStatus, RunSummary};
use colored::Colorize;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn generate_report(summary: &RunSummary, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(summary)),
        ReportFormat::Json => generate_json_report(summary),
    }
}

pub fn generate_text_report(summary: &RunSummary) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                         SITEPROBE VALIDATION REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Input:        {}\n", summary.input_dir.display()));
    report.push_str(&format!("Output:       {}\n", summary.output_dir.display()));
    report.push_str(&format!(
        "Started:      {}\n",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    let elapsed = summary.finished_at - summary.started_at;
    report.push_str(&format!(
        "Duration:     {:.1} seconds\n",
        elapsed.num_milliseconds() as f64 / 1000.0
    ));
    report.push('\n');

    report.push_str(&format!("Files written:  {}\n", summary.files.len()));
    report.push_str(&format!("Files skipped:  {}\n", summary.failures.len()));
    report.push_str(&format!("  Live:       {}\n", summary.count(EntryStatus::Live)));
    report.push_str(&format!("  Removed:    {}\n", summary.count(EntryStatus::Dead)));
    report.push_str(&format!("  Unprobed:   {}\n", summary.count(EntryStatus::Unprobed)));
    report.push_str(&format!("  Disabled:   {}\n", summary.count(EntryStatus::Disabled)));
    report.push('\n');

    for file in &summary.files {
        report.push_str(RULE);
        report.push_str(&format!(
            "{} -> {} ({})\n",
            file_name(&file.input),
            file_name(&file.output),
            file.shape
        ));
        report.push_str(RULE);
        for entry in &file.entries {
            report.push_str(&format_entry(entry));
        }
        report.push('\n');
    }

    if !summary.failures.is_empty() {
        report.push_str(RULE);
        report.push_str("SKIPPED FILES\n");
        report.push_str(RULE);
        for failure in &summary.failures {
            report.push_str(&format!(
                "  {} {}: {}\n",
                "✗".red(),
                file_name(&failure.input),
                failure.error
            ));
        }
        report.push('\n');
    }

    report
}

pub fn generate_json_report(summary: &RunSummary) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Siteprobe",
                "version": env!("CARGO_PKG_VERSION"),
                "format": "json",
            },
            "totals": {
                "files_written": summary.files.len(),
                "files_skipped": summary.failures.len(),
                "live": summary.count(EntryStatus::Live),
                "removed": summary.count(EntryStatus::Dead),
                "unprobed": summary.count(EntryStatus::Unprobed),
                "disabled": summary.count(EntryStatus::Disabled),
            },
            "run": summary,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

fn format_entry(entry: &EntryReport) -> String {
    let tag = match entry.status {
        EntryStatus::Live => "LIVE".green().bold(),
        EntryStatus::Dead => "DEAD".red().bold(),
        EntryStatus::Unprobed => "SKIP".cyan(),
        EntryStatus::Disabled => "OFF ".bright_black(),
    };

    let detail = match entry.verdict {
        Some(ref verdict) => {
            let mut parts = vec![format!(
                "{} attempt{}",
                verdict.attempts,
                if verdict.attempts == 1 { "" } else { "s" }
            )];
            if let Some(status) = verdict.last_status_code {
                parts.push(format!("HTTP {}", status));
            }
            if !verdict.is_live()
                && let Some(ref error) = verdict.last_error
            {
                parts.push(error.clone());
            }
            format!("  ({})", parts.join(", "))
        }
        None => String::new(),
    };

    format!("  [{}] {}  {}{}\n", tag, entry.name, entry.url, detail)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
