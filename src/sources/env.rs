//! Environment variable configuration source.

use super::{Pair, Pairs, Source};
use crate::core::{SourceId, Value};

/// Environment variable configuration source.
///
/// Works on an explicit snapshot of variables; it never reads the process
/// environment itself. Pass `std::env::vars()` to use the live environment.
///
/// # Examples
///
/// ```rust
/// use figstore::sources::EnvSource;
///
/// // Live environment, only APP_* variables, prefix stripped
/// let source = EnvSource::new(std::env::vars()).with_prefix("APP_");
/// ```
#[derive(Debug, Clone)]
pub struct EnvSource {
    vars: Vec<(String, String)>,
    prefix: Option<String>,
}

impl EnvSource {
    /// Create a source over a snapshot of variables.
    pub fn new<K, V, I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            prefix: None,
        }
    }

    /// Only surface variables starting with `prefix`, with the prefix removed.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    fn select(&self, (key, value): &(String, String)) -> Option<Pair> {
        let key = match &self.prefix {
            Some(prefix) => key.strip_prefix(prefix.as_str()).filter(|k| !k.is_empty())?,
            None => key.as_str(),
        };
        Some((key.to_string(), Value::from(value.as_str())))
    }
}

impl Source for EnvSource {
    fn pairs(&self) -> Pairs<'_> {
        Box::new(self.vars.iter().filter_map(|var| self.select(var)).map(Ok))
    }

    fn id(&self) -> SourceId {
        match &self.prefix {
            Some(prefix) => SourceId::reader_with("env", format!("{}*", prefix)),
            None => SourceId::reader("env"),
        }
    }
}
