pub mod discover;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod recompose;
pub mod report;

use colored::Colorize;

pub use error::{PipelineError, Result};
pub use pipeline::{
    DEFAULT_API_MARKERS, DocumentReport, EntryProgressCallback, EntryReport, EntryStatus,
    FileFailure, FileReport, RunOptions, RunSummary, ValidateOptions, execute_run, is_api_like,
    process_file, validate_document,
};
pub use report::ReportFormat;

pub fn print_banner() {
    let banner = r#"
     _ _                        _
 ___(_) |_ ___ _ __  _ __ ___ | |__   ___
/ __| | __/ _ \ '_ \| '__/ _ \| '_ \ / _ \
\__ \ | ||  __/ |_) | | | (_) | |_) |  __/
|___/_|\__\___| .__/|_|  \___/|_.__/ \___|
              |_|"#;
    eprintln!("{}", banner.bright_cyan().bold());
    eprintln!(
        "{}\n",
        format!("  endpoint liveness for site configurations v{}", env!("CARGO_PKG_VERSION"))
            .bright_black()
    );
}
