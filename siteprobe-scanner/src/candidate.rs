use serde::{Deserialize, Serialize};
use std::fmt;

/// One step from a document node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Locator of a node inside the configuration document it was extracted from.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePath(Vec<PathSegment>);

impl SourcePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders as a JSON pointer (RFC 6901); the root is the empty string.
impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => write!(f, "/{}", key.replace('~', "~0").replace('/', "~1"))?,
                PathSegment::Index(index) => write!(f, "/{}", index)?,
            }
        }
        Ok(())
    }
}

/// An endpoint pulled out of a configuration document, pending a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCandidate {
    pub id: String,
    pub name: String,
    pub url: String,
    pub detail_url: Option<String>,
    pub enabled: bool,
    pub source_path: SourcePath,
}

impl EndpointCandidate {
    pub fn new(id: String, url: String, source_path: SourcePath) -> Self {
        Self {
            name: id.clone(),
            id,
            url,
            detail_url: None,
            enabled: true,
            source_path,
        }
    }
}

/// Which document layout the extractor recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigShape {
    /// `{"api_site": {"<id>": {...}, ...}}`
    KeyedSites,
    /// `{"sites": [{...}, ...]}`
    SiteList,
    /// `[{...}, ...]`
    TopLevelList,
    /// `{"name": ..., "api": "https://..."}`
    InlineSite,
    /// Anything else, searched recursively.
    Nested,
}

impl fmt::Display for ConfigShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigShape::KeyedSites => write!(f, "keyed sites"),
            ConfigShape::SiteList => write!(f, "site list"),
            ConfigShape::TopLevelList => write!(f, "top-level list"),
            ConfigShape::InlineSite => write!(f, "inline site"),
            ConfigShape::Nested => write!(f, "nested"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub shape: ConfigShape,
    pub candidates: Vec<EndpointCandidate>,
    /// Malformed entries inside a recognized collection, or entries whose URL did not parse.
    pub skipped: Vec<SourcePath>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_path_pointer() {
        let path = SourcePath::root().key("api_site").key("a/b").index(3);
        assert_eq!(path.to_string(), "/api_site/a~1b/3");
        assert_eq!(SourcePath::root().to_string(), "");
    }

    #[test]
    fn test_source_path_ordering_puts_later_indices_last() {
        let base = SourcePath::root().key("sites");
        let mut paths = vec![base.index(10), base.index(2), base.index(7)];
        paths.sort();
        assert_eq!(paths, vec![base.index(2), base.index(7), base.index(10)]);
    }

    #[test]
    fn test_candidate_name_defaults_to_id() {
        let candidate = EndpointCandidate::new(
            "site_0".to_string(),
            "https://example.com/api.php".to_string(),
            SourcePath::root().index(0),
        );
        assert_eq!(candidate.name, "site_0");
        assert!(candidate.enabled);
        assert!(candidate.detail_url.is_none());
    }
}
