// Tests for input discovery and output naming

use siteprobe_core::PipelineError;
use siteprobe_core::discover::{discover_inputs, output_paths};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_discovers_sorted_json_files_only() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.json"), "{}").unwrap();
    fs::write(dir.path().join("a.JSON"), "{}").unwrap();
    fs::write(dir.path().join("notes.txt"), "x").unwrap();
    fs::create_dir(dir.path().join("nested.json")).unwrap();

    let inputs = discover_inputs(dir.path()).unwrap();

    let names: Vec<String> = inputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.JSON", "b.json"]);
}

#[test]
fn test_missing_directory_is_no_input() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = discover_inputs(&missing).unwrap_err();

    assert!(matches!(err, PipelineError::NoInput { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_directory_without_json_is_no_input() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("readme.md"), "# hi").unwrap();

    let err = discover_inputs(dir.path()).unwrap_err();

    assert!(matches!(err, PipelineError::NoInput { .. }));
}

#[test]
fn test_output_paths_use_input_stem() {
    let (json, encoded) = output_paths(Path::new("input/config.json"), Path::new("out"));

    assert_eq!(json, Path::new("out/config.json"));
    assert_eq!(encoded, Path::new("out/config_base58.txt"));
}
