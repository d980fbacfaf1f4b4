// Input discovery: configuration documents in a directory

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collect the `*.json` files directly inside `dir`, sorted by file name.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::NoInput {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut inputs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();

    inputs.sort();
    debug!("Discovered {} input file(s) in {}", inputs.len(), dir.display());

    if inputs.is_empty() {
        return Err(PipelineError::NoInput {
            path: dir.to_path_buf(),
            reason: "no .json files".to_string(),
        });
    }

    Ok(inputs)
}

/// Output locations for one input: the filtered document and its base58 transcription.
pub fn output_paths(input: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("config");
    (
        output_dir.join(format!("{}.json", stem)),
        output_dir.join(format!("{}_base58.txt", stem)),
    )
}
