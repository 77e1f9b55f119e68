//! History entries and provenance tags.

use super::Value;
use serde::Serialize;
use std::fmt;

/// Identifies where a value came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum SourceId {
    /// A concrete reader, e.g. `json` with the file it read.
    Reader {
        /// Reader kind (`args`, `env`, `ini`, `json`, `xml`, `toml`, `manual`)
        kind: &'static str,
        /// Optional detail such as a path or INI section
        detail: Option<String>,
    },
    /// Untyped input labelled by the caller or by its shape (`map`, `pairs`).
    Generic(String),
}

impl SourceId {
    /// Identity for a concrete reader with no further detail.
    pub fn reader(kind: &'static str) -> Self {
        Self::Reader { kind, detail: None }
    }

    /// Identity for a concrete reader with a detail string.
    pub fn reader_with(kind: &'static str, detail: impl Into<String>) -> Self {
        Self::Reader {
            kind,
            detail: Some(detail.into()),
        }
    }

    /// Identity for untyped input.
    pub fn generic(label: impl Into<String>) -> Self {
        Self::Generic(label.into())
    }

    /// Whether this identity was synthesized for untyped input.
    pub fn is_generic(&self) -> bool {
        matches!(self, Self::Generic(_))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reader { kind, detail: None } => f.write_str(kind),
            Self::Reader {
                kind,
                detail: Some(detail),
            } => write!(f, "{}:{}", kind, detail),
            Self::Generic(label) => f.write_str(label),
        }
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.to_string()
    }
}

/// One immutable entry in a key's history.
///
/// A `Fig` records the value a key held after one `load` or `set`, and which
/// source produced it. Figs are never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fig {
    key: String,
    value: Value,
    source: SourceId,
}

impl Fig {
    /// Create a new history entry.
    pub fn new(key: impl Into<String>, value: impl Into<Value>, source: SourceId) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            source,
        }
    }

    /// The key this entry belongs to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The recorded value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Where the value came from.
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// Take the value out of the entry.
    pub fn into_value(self) -> Value {
        self.value
    }

    pub(crate) fn with_key(mut self, key: String) -> Self {
        self.key = key;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_display() {
        assert_eq!(SourceId::reader("env").to_string(), "env");
        assert_eq!(SourceId::reader_with("json", "app.json").to_string(), "json:app.json");
        assert_eq!(SourceId::generic("map").to_string(), "map");
    }

    #[test]
    fn test_generic_flag() {
        assert!(SourceId::generic("pairs").is_generic());
        assert!(!SourceId::reader("args").is_generic());
    }

    #[test]
    fn test_fig_accessors() {
        let fig = Fig::new("port", 8080, SourceId::reader("args"));
        assert_eq!(fig.key(), "port");
        assert_eq!(fig.value().as_str(), Some("8080"));
        assert_eq!(fig.source(), &SourceId::reader("args"));
    }
}
