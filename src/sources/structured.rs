//! JSON, XML and TOML tree sources.

use super::{Pairs, Source};
use crate::core::{SourceId, Table, Value};
use crate::error::{ConfigError, Result};
use crate::parse::{parse_json, parse_xml};
use std::fmt;
use std::path::{Path, PathBuf};

/// A structured text format understood by [`StructuredSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// The object-only JSON subset.
    Json,
    /// The minimal XML subset.
    Xml,
    /// TOML, via the `toml` crate.
    #[cfg(feature = "toml")]
    Toml,
}

impl Format {
    /// Detect the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` for missing or unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ConfigError::LoadError(format!(
                    "Unable to determine file format for: {}",
                    path.display()
                ))
            })?;

        match extension {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            #[cfg(feature = "toml")]
            "toml" => Ok(Self::Toml),
            _ => Err(ConfigError::LoadError(format!(
                "Unsupported file extension: {}. Supported: {}",
                extension,
                Self::SUPPORTED
            ))),
        }
    }

    #[cfg(feature = "toml")]
    const SUPPORTED: &'static str = ".json, .xml, .toml";
    #[cfg(not(feature = "toml"))]
    const SUPPORTED: &'static str = ".json, .xml";

    fn kind(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            #[cfg(feature = "toml")]
            Self::Toml => "toml",
        }
    }

    /// Parse `text` into a value tree.
    fn parse(self, text: &str) -> Result<Value> {
        match self {
            Self::Json => parse_json(text.as_bytes()).map(Value::Nested),
            Self::Xml => parse_xml(text.as_bytes()),
            #[cfg(feature = "toml")]
            Self::Toml => parse_toml(text).map(Value::Nested),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// A source over the top level of a parsed JSON, XML or TOML document.
///
/// The document is parsed when the source is built. An optional dotted path
/// selects a sub-tree first. Entries are produced in key order; nested maps
/// are passed through as [`Value::Nested`] rather than flattened further.
///
/// # Examples
///
/// ```rust
/// use figstore::sources::{Source, StructuredSource};
///
/// let source = StructuredSource::json(r#"{"db": {"host": "localhost", "port": 5432}}"#)?
///     .select("db")?;
/// let keys: Vec<String> = source.pairs().map(|p| p.unwrap().0).collect();
/// assert_eq!(keys, ["host", "port"]);
/// # Ok::<(), figstore::error::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StructuredSource {
    format: Format,
    origin: Option<PathBuf>,
    entries: Table,
}

impl StructuredSource {
    /// Parse `text` as `format` and select the sub-tree at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for malformed text and `NavigationError` if `path`
    /// does not address a map.
    pub fn parse(format: Format, text: &str, path: &str) -> Result<Self> {
        let tree = format.parse(text)?;
        Ok(Self {
            format,
            origin: None,
            entries: select_table(&tree, path)?,
        })
    }

    /// Parse a JSON document.
    pub fn json(text: &str) -> Result<Self> {
        Self::parse(Format::Json, text, "")
    }

    /// Parse an XML document.
    pub fn xml(text: &str) -> Result<Self> {
        Self::parse(Format::Xml, text, "")
    }

    /// Parse a TOML document.
    #[cfg(feature = "toml")]
    pub fn toml(text: &str) -> Result<Self> {
        Self::parse(Format::Toml, text, "")
    }

    /// Read and parse a file, detecting the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` for unsupported extensions, `IoError` if the file
    /// cannot be read, and parse/navigation errors as for [`parse`](Self::parse).
    pub fn from_file(file: impl AsRef<Path>, path: &str) -> Result<Self> {
        let file = file.as_ref();
        let format = Format::from_path(file)?;
        let text = std::fs::read_to_string(file)?;
        let mut source = Self::parse(format, &text, path)?;
        source.origin = Some(file.to_path_buf());
        Ok(source)
    }

    /// Narrow this source to the sub-tree at `path`.
    pub fn select(self, path: &str) -> Result<Self> {
        let entries = select_table(&Value::Nested(self.entries), path)?;
        Ok(Self { entries, ..self })
    }

    /// The format this source was parsed from.
    pub fn format(&self) -> Format {
        self.format
    }

    /// The selected entries.
    pub fn entries(&self) -> &Table {
        &self.entries
    }
}

fn select_table(tree: &Value, path: &str) -> Result<Table> {
    match tree.navigate(path)? {
        Value::Nested(map) => Ok(map.clone()),
        Value::Scalar(_) if path.is_empty() => Err(ConfigError::navigation(
            path,
            "document root is not a container",
        )),
        Value::Scalar(_) => Err(ConfigError::navigation(path, "value is not a map")),
    }
}

impl Source for StructuredSource {
    fn pairs(&self) -> Pairs<'_> {
        Box::new(
            self.entries
                .iter()
                .map(|(key, value)| Ok((key.clone(), value.clone()))),
        )
    }

    fn id(&self) -> SourceId {
        match &self.origin {
            Some(file) => SourceId::reader_with(self.format.kind(), file.display().to_string()),
            None => SourceId::reader(self.format.kind()),
        }
    }
}

#[cfg(feature = "toml")]
fn parse_toml(text: &str) -> Result<Table> {
    let table: toml::Table = text.parse().map_err(|e: toml::de::Error| ConfigError::ParseError {
        format: "toml",
        position: e.span().map_or(0, |span| span.start),
        kind: crate::error::ParseErrorKind::Foreign(e.message().to_string()),
    })?;
    toml_table(table)
}

/// Convert a TOML table, keeping scalars as their textual form.
#[cfg(feature = "toml")]
fn toml_table(table: toml::Table) -> Result<Table> {
    table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => Value::Scalar(s),
                toml::Value::Integer(i) => Value::from(i),
                toml::Value::Float(f) => Value::Scalar(toml_float(f)),
                toml::Value::Boolean(b) => Value::from(b),
                toml::Value::Datetime(d) => Value::Scalar(d.to_string()),
                toml::Value::Table(t) => Value::Nested(toml_table(t)?),
                toml::Value::Array(_) => {
                    return Err(ConfigError::ParseError {
                        format: "toml",
                        position: 0,
                        kind: crate::error::ParseErrorKind::UnsupportedArray,
                    });
                }
            };
            Ok((key, value))
        })
        .collect()
}

/// Render a float the way TOML writes it, keeping `.0` on whole numbers.
#[cfg(feature = "toml")]
fn toml_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else {
        format!("{f:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_json_top_level_entries() {
        let source = StructuredSource::json(r#"{"a":"1","b":{"c":"2"}}"#).unwrap();
        let pairs: Vec<_> = source.pairs().map(Result::unwrap).collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("a".to_string(), Value::from("1")));
        assert!(pairs[1].1.is_nested());
        assert_eq!(source.id().to_string(), "json");
    }

    #[test]
    fn test_json_path_selects_subtree() {
        let source = StructuredSource::parse(Format::Json, r#"{"a":"1","b":{"c":"2"}}"#, "b").unwrap();
        assert_eq!(source.entries().len(), 1);
        assert_eq!(source.entries()["c"], Value::from("2"));
    }

    #[test]
    fn test_xml_path_selects_subtree() {
        let source =
            StructuredSource::parse(Format::Xml, "<r><a>1</a><b><c>2</c></b></r>", "b").unwrap();
        let mut expected = Table::new();
        expected.insert("c".to_string(), Value::from("2"));
        assert_eq!(source.entries(), &expected);
    }

    #[test]
    fn test_path_to_scalar_is_navigation_error() {
        let err = StructuredSource::parse(Format::Json, r#"{"a":"1"}"#, "a").unwrap_err();
        assert!(matches!(err, ConfigError::NavigationError { .. }));

        let err = StructuredSource::parse(Format::Json, r#"{"a":"1"}"#, "missing").unwrap_err();
        assert!(matches!(err, ConfigError::NavigationError { .. }));
    }

    #[test]
    fn test_xml_leaf_root_rejected() {
        let err = StructuredSource::xml("<a>text</a>").unwrap_err();
        assert!(matches!(err, ConfigError::NavigationError { .. }));
    }

    #[test]
    fn test_parse_error_propagates() {
        let err = StructuredSource::json(r#"{"a":[1,2]}"#).unwrap_err();
        assert_eq!(err.parse_kind(), Some(&ParseErrorKind::UnsupportedArray));
    }

    #[test]
    fn test_select_chains() {
        let source = StructuredSource::json(r#"{"a":{"b":{"c":"1"}}}"#)
            .unwrap()
            .select("a")
            .unwrap()
            .select("b")
            .unwrap();
        assert_eq!(source.entries()["c"], Value::from("1"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.xml")).unwrap(), Format::Xml);
        assert!(Format::from_path(Path::new("a.yaml")).is_err());
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_from_file_records_origin() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.json");
        fs::write(&path, r#"{"server": {"port": 8080}}"#).unwrap();

        let source = StructuredSource::from_file(&path, "server").unwrap();
        assert_eq!(source.entries()["port"], Value::from("8080"));
        assert_eq!(source.id(), SourceId::reader_with("json", path.display().to_string()));
    }

    #[test]
    fn test_from_missing_file() {
        let err = StructuredSource::from_file("/nonexistent/app.json", "").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_scalars_become_text() {
        let text = r#"
name = "svc"
port = 8080
ratio = 0.5
debug = true

[db]
host = "localhost"
"#;
        let source = StructuredSource::toml(text).unwrap();
        let entries = source.entries();
        assert_eq!(entries["name"], Value::from("svc"));
        assert_eq!(entries["port"], Value::from("8080"));
        assert_eq!(entries["ratio"], Value::from("0.5"));
        assert_eq!(entries["debug"], Value::from("true"));
        assert_eq!(entries["db"].get("host"), Some(&Value::from("localhost")));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_path_and_arrays() {
        let source = StructuredSource::parse(Format::Toml, "[a.b]\nc = 1\n", "a.b").unwrap();
        assert_eq!(source.entries()["c"], Value::from("1"));

        let err = StructuredSource::toml("ports = [1, 2]").unwrap_err();
        assert_eq!(err.parse_kind(), Some(&ParseErrorKind::UnsupportedArray));

        let err = StructuredSource::toml("= broken").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { format: "toml", .. }));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_floats_keep_fraction() {
        let source =
            StructuredSource::toml("whole = 1.0\nexp = 1e3\nneg = -2.5\nbig = inf\n").unwrap();
        let entries = source.entries();
        assert_eq!(entries["whole"], Value::from("1.0"));
        assert_eq!(entries["exp"], Value::from("1000.0"));
        assert_eq!(entries["neg"], Value::from("-2.5"));
        assert_eq!(entries["big"], Value::from("inf"));
        assert_eq!(StructuredSource::toml("x = nan").unwrap().entries()["x"], Value::from("nan"));
    }
}
