//! Candidate extraction from configuration documents of unknown shape.
//!
//! Shapes are tried in a fixed order and the first match wins:
//! keyed site map, site list under a key, top-level list, inline site,
//! and finally a recursive search for name + URL bearing maps.

use crate::candidate::{ConfigShape, EndpointCandidate, Extraction, SourcePath};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// Keys that hold the endpoint URL, in order of preference.
const URL_KEYS: &[&str] = &[
    "api", "url", "endpoint", "base_url", "baseUrl", "apiUrl", "api_url",
];
const DETAIL_KEYS: &[&str] = &["detail", "detail_url", "detailUrl"];
const NAME_KEYS: &[&str] = &["name", "title", "label", "site_name", "siteName"];
/// Well-known collection keys, tried before any other key of the document.
const COLLECTION_KEYS: &[&str] = &["api_site", "api_sites", "sites", "apis"];

/// Id given to the candidate of a document that is itself a single site.
pub const INLINE_SITE_ID: &str = "single_site";

pub fn extract(config: &Value) -> Vec<EndpointCandidate> {
    extract_with_shape(config).candidates
}

pub fn extract_with_shape(config: &Value) -> Extraction {
    let root = SourcePath::root();

    if let Value::Object(map) = config {
        let keys = collection_key_order(map);

        for key in &keys {
            if let Some(Value::Object(sites)) = map.get(*key)
                && sites.values().any(is_site)
            {
                debug!("Matched keyed site map under '{}'", key);
                return keyed_sites(sites, &root.key(key));
            }
        }

        for key in &keys {
            if let Some(Value::Array(items)) = map.get(*key)
                && items.iter().any(is_site)
            {
                debug!("Matched site list under '{}'", key);
                return site_list(items, &root.key(key), ConfigShape::SiteList);
            }
        }
    }

    if let Value::Array(items) = config
        && items.iter().any(is_site)
    {
        debug!("Matched top-level site list");
        return site_list(items, &root, ConfigShape::TopLevelList);
    }

    if let Value::Object(map) = config
        && find_url(map).is_some()
    {
        debug!("Matched inline site");
        let mut extraction = Extraction {
            shape: ConfigShape::InlineSite,
            candidates: Vec::new(),
            skipped: Vec::new(),
        };
        match build_candidate(INLINE_SITE_ID, map, root.clone()) {
            Some(candidate) => extraction.candidates.push(candidate),
            None => extraction.skipped.push(root),
        }
        return extraction;
    }

    debug!("No known shape matched, searching recursively");
    let mut extraction = Extraction {
        shape: ConfigShape::Nested,
        candidates: Vec::new(),
        skipped: Vec::new(),
    };
    let mut counter = 0;
    walk(config, &root, &mut extraction, &mut counter);
    extraction
}

fn collection_key_order(map: &Map<String, Value>) -> Vec<&str> {
    let mut keys: Vec<&str> = COLLECTION_KEYS
        .iter()
        .copied()
        .filter(|key| map.contains_key(*key))
        .collect();
    keys.extend(
        map.keys()
            .map(String::as_str)
            .filter(|key| !COLLECTION_KEYS.contains(key)),
    );
    keys
}

fn keyed_sites(sites: &Map<String, Value>, base: &SourcePath) -> Extraction {
    let mut extraction = Extraction {
        shape: ConfigShape::KeyedSites,
        candidates: Vec::with_capacity(sites.len()),
        skipped: Vec::new(),
    };

    for (id, info) in sites {
        let path = base.key(id);
        match info
            .as_object()
            .and_then(|site| build_candidate(id, site, path.clone()))
        {
            Some(candidate) => extraction.candidates.push(candidate),
            None => {
                debug!("Skipping malformed site entry at {}", path);
                extraction.skipped.push(path);
            }
        }
    }

    extraction
}

fn site_list(items: &[Value], base: &SourcePath, shape: ConfigShape) -> Extraction {
    let mut extraction = Extraction {
        shape,
        candidates: Vec::with_capacity(items.len()),
        skipped: Vec::new(),
    };

    for (index, item) in items.iter().enumerate() {
        let path = base.index(index);
        let id = format!("site_{}", index);
        match item
            .as_object()
            .and_then(|site| build_candidate(&id, site, path.clone()))
        {
            Some(candidate) => extraction.candidates.push(candidate),
            None => {
                debug!("Skipping malformed list entry at {}", path);
                extraction.skipped.push(path);
            }
        }
    }

    extraction
}

fn walk(value: &Value, path: &SourcePath, extraction: &mut Extraction, counter: &mut usize) {
    match value {
        Value::Object(map) => {
            if has_name(map) && find_url(map).is_some() {
                let id = format!("site_{}", counter);
                *counter += 1;
                match build_candidate(&id, map, path.clone()) {
                    Some(candidate) => extraction.candidates.push(candidate),
                    None => extraction.skipped.push(path.clone()),
                }
                return;
            }
            for (key, child) in map {
                walk(child, &path.key(key), extraction, counter);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, &path.index(index), extraction, counter);
            }
        }
        _ => {}
    }
}

fn build_candidate(
    id: &str,
    site: &Map<String, Value>,
    source_path: SourcePath,
) -> Option<EndpointCandidate> {
    let (url_key, raw_url) = find_url(site)?;

    match Url::parse(raw_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => {
            debug!("Dropping {} with unsupported scheme '{}'", id, parsed.scheme());
            return None;
        }
        Err(e) => {
            debug!("Dropping {} with unparsable URL '{}': {}", id, raw_url, e);
            return None;
        }
    }

    let mut candidate = EndpointCandidate::new(id.to_string(), raw_url.to_string(), source_path);

    if let Some(name) = NAME_KEYS
        .iter()
        .filter_map(|key| site.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())
    {
        candidate.name = name.to_string();
    }

    candidate.detail_url = DETAIL_KEYS
        .iter()
        .filter(|key| **key != url_key)
        .filter_map(|key| site.get(*key).and_then(Value::as_str))
        .find(|value| is_url_like(value))
        .map(String::from);

    let enabled = site.get("enabled").and_then(Value::as_bool).unwrap_or(true);
    let disabled = site.get("disabled").and_then(Value::as_bool).unwrap_or(false);
    candidate.enabled = enabled && !disabled;

    Some(candidate)
}

fn is_site(value: &Value) -> bool {
    value.as_object().is_some_and(|site| find_url(site).is_some())
}

fn has_name(site: &Map<String, Value>) -> bool {
    NAME_KEYS
        .iter()
        .any(|key| site.get(*key).is_some_and(Value::is_string))
}

/// The URL-bearing field of a site: a preferred key first, else the first
/// string field that starts with an HTTP scheme.
fn find_url(site: &Map<String, Value>) -> Option<(&str, &str)> {
    for key in URL_KEYS {
        if let Some(value) = site.get(*key).and_then(Value::as_str)
            && is_url_like(value)
        {
            return Some((*key, value));
        }
    }

    site.iter().find_map(|(key, value)| {
        value
            .as_str()
            .filter(|v| is_url_like(v))
            .map(|v| (key.as_str(), v))
    })
}

pub fn is_url_like(value: &str) -> bool {
    let value = value.trim_start();
    let prefix: String = value.chars().take(8).collect::<String>().to_ascii_lowercase();
    prefix.starts_with("http://") || prefix.starts_with("https://")
}
