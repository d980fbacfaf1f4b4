use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No readable input in {}: {reason}", path.display())]
    NoInput { path: PathBuf, reason: String },

    #[error("Failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No endpoints found in {}", path.display())]
    ExtractionEmpty { path: PathBuf },

    #[error("Invalid base58 text: {0}")]
    Decode(#[from] bs58::decode::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// `partial` lists the files finished before the limit hit.
    #[error("Run timed out after {limit:?}")]
    Timeout {
        limit: std::time::Duration,
        partial: Box<crate::pipeline::RunSummary>,
    },

    #[error("Scanner error: {0}")]
    Scanner(#[from] siteprobe_scanner::ScanError),
}

impl PipelineError {
    /// Whether the whole batch must stop, as opposed to skipping one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PipelineError::NoInput { .. } | PipelineError::Timeout { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
