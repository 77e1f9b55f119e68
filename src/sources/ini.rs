//! INI file configuration source.

use super::{Pair, Pairs, Source};
use crate::core::{SourceId, Value};
use crate::error::Result;
use std::path::Path;

/// INI section configuration source.
///
/// Surfaces the `key=value` (or `key:value`) lines of one `[section]`.
/// Lines starting with `#` or `;` and blank lines are ignored, as are lines
/// with neither separator. Keys and values are trimmed.
///
/// # Examples
///
/// ```rust
/// use figstore::sources::{IniSource, Source};
///
/// let text = "[server]\nport = 8080\n[client]\nport = 9090\n";
/// let source = IniSource::parse(text, "server");
/// let (key, value) = source.pairs().next().unwrap()?;
/// assert_eq!((key.as_str(), value.as_str()), ("port", Some("8080")));
/// # Ok::<(), figstore::error::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IniSource {
    pairs: Vec<Pair>,
    origin: String,
}

impl IniSource {
    /// Scan `text` and keep the entries of `section`.
    pub fn parse(text: &str, section: &str) -> Self {
        Self {
            pairs: scan_section(text, section),
            origin: format!("[{}]", section),
        }
    }

    /// Read and scan an INI file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>, section: &str) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(Self {
            pairs: scan_section(&text, section),
            origin: format!("{}[{}]", path.display(), section),
        })
    }
}

fn scan_section(text: &str, section: &str) -> Vec<Pair> {
    let mut current = "";
    let mut pairs = Vec::new();

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = name.trim();
            continue;
        }
        if current != section {
            continue;
        }

        match line.find(['=', ':']) {
            Some(split) => {
                let key = line[..split].trim();
                let value = line[split + 1..].trim();
                pairs.push((key.to_string(), Value::from(value)));
            }
            None => {
                tracing::debug!(line = lineno + 1, content = line, "skipping malformed INI line");
            }
        }
    }

    pairs
}

impl Source for IniSource {
    fn pairs(&self) -> Pairs<'_> {
        Box::new(self.pairs.iter().cloned().map(Ok))
    }

    fn id(&self) -> SourceId {
        SourceId::reader_with("ini", self.origin.clone())
    }
}
