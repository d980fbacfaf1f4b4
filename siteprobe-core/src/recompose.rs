// Rebuild a configuration document keeping only the retained endpoints

use serde_json::{Map, Value};
use siteprobe_scanner::{Extraction, PathSegment, SourcePath};
use std::collections::HashSet;
use tracing::debug;

/// Returns a copy of `original` without the candidates whose id is not in `keep`
/// and without malformed entries of the recognized collection. Everything else
/// in the document is left untouched.
pub fn recompose(original: &Value, extraction: &Extraction, keep: &HashSet<String>) -> Value {
    let mut removals: Vec<&SourcePath> = extraction
        .candidates
        .iter()
        .filter(|candidate| !keep.contains(&candidate.id))
        .map(|candidate| &candidate.source_path)
        .chain(extraction.skipped.iter())
        .collect();

    // Back to front, so array indices of pending removals stay valid.
    removals.sort();
    removals.dedup();
    removals.reverse();

    let mut document = original.clone();
    for path in removals {
        if path.is_root() {
            debug!("Root entry removed, emitting empty document");
            return Value::Object(Map::new());
        }
        remove_at(&mut document, path);
    }

    document
}

fn remove_at(document: &mut Value, path: &SourcePath) {
    let Some((last, parents)) = path.segments().split_last() else {
        return;
    };

    let mut node = document;
    for segment in parents {
        let next = match (node, segment) {
            (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key),
            (Value::Array(items), PathSegment::Index(index)) => items.get_mut(*index),
            _ => None,
        };
        match next {
            Some(child) => node = child,
            None => {
                debug!("Path {} no longer present, skipping removal", path);
                return;
            }
        }
    }

    match (node, last) {
        (Value::Object(map), PathSegment::Key(key)) => {
            map.shift_remove(key);
        }
        (Value::Array(items), PathSegment::Index(index)) if *index < items.len() => {
            items.remove(*index);
        }
        _ => debug!("Path {} does not address a removable entry", path),
    }
}
