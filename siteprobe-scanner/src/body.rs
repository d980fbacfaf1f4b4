//! Response body sniffing, independent of any network I/O.

use serde_json::Value;

/// Upper bound on how much of a response body is read and classified.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

const HTML_MARKERS: &[&str] = &["<!doctype html", "<html", "<head", "<body", "<title"];
const XML_MARKERS: &[&str] = &["<?xml", "<rss"];
const COLLECTION_FIELDS: &[&str] = &[
    "list", "data", "items", "results", "records", "class", "vod", "rows",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// A list of records, or an object/XML feed carrying one. Strong liveness signal.
    Records,
    /// Parseable JSON with no recognizable collection.
    Structured,
    /// An HTML page, usually an error or placeholder served with a 200.
    Html,
    /// Anything else that is not empty.
    Opaque,
    Empty,
}

pub fn classify_body(content_type: Option<&str>, head: &[u8]) -> BodyKind {
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let trimmed = &head[start..];

    if trimmed.is_empty() {
        return BodyKind::Empty;
    }

    let prefix: Vec<u8> = trimmed.iter().take(16).map(u8::to_ascii_lowercase).collect();
    if HTML_MARKERS.iter().any(|marker| prefix.starts_with(marker.as_bytes())) {
        return BodyKind::Html;
    }
    if XML_MARKERS.iter().any(|marker| prefix.starts_with(marker.as_bytes())) {
        return BodyKind::Records;
    }

    match serde_json::from_slice::<Value>(trimmed) {
        Ok(Value::Array(_)) => BodyKind::Records,
        Ok(Value::Object(map)) => {
            if COLLECTION_FIELDS.iter().any(|field| map.contains_key(*field)) {
                BodyKind::Records
            } else {
                BodyKind::Structured
            }
        }
        Ok(_) => BodyKind::Structured,
        Err(_) => {
            let declared_html = content_type
                .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
                .unwrap_or(false);
            if declared_html && trimmed.starts_with(b"<") {
                BodyKind::Html
            } else {
                BodyKind::Opaque
            }
        }
    }
}
