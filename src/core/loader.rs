//! Drain phase of a `load`: collects pairs from sources into a transient map.

use crate::core::{Fig, FigStore, SourceId};
use crate::error::Result;
use crate::sources::Source;
use std::collections::HashSet;

/// Collects an ordered list of sources for a single `load` call.
///
/// Sources listed first win ties within the call: once a key has been produced,
/// later sources' values for that key are discarded. Across calls the newest
/// commit always becomes the current value.
///
/// # Examples
///
/// ```rust
/// use figstore::prelude::*;
///
/// let store = FigStore::new();
/// let cli = MemorySource::from_pairs([("port", "9090")]);
/// let defaults = MemorySource::from_pairs([("port", "8080"), ("host", "localhost")]);
///
/// Loader::new()
///     .add_source(&cli)
///     .add_source(&defaults)
///     .load_into(&store)?;
///
/// assert_eq!(store.get("port")?.as_str(), Some("9090"));
/// assert_eq!(store.get("host")?.as_str(), Some("localhost"));
/// # Ok::<(), figstore::error::ConfigError>(())
/// ```
#[derive(Default)]
pub struct Loader<'a> {
    sources: Vec<&'a dyn Source>,
    name: Option<String>,
}

impl<'a> Loader<'a> {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source. Earlier sources take precedence within this call.
    pub fn add_source(mut self, source: &'a dyn Source) -> Self {
        self.sources.push(source);
        self
    }

    /// Label untyped sources (maps, pair lists) in this call with `name`.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Resolve the provenance tag for one source in this call.
    fn resolve_id(&self, source: &dyn Source) -> SourceId {
        let id = source.id();
        match &self.name {
            Some(name) if id.is_generic() => SourceId::generic(name.clone()),
            _ => id,
        }
    }

    /// Drain every source, keeping the first value seen for each key.
    ///
    /// Entries are returned in the order their keys were first produced. No
    /// store lock is involved; this is where source I/O and user transforms run.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by any source.
    pub fn drain(&self) -> Result<Vec<Fig>> {
        let mut seen = HashSet::new();
        let mut figs = Vec::new();

        for source in &self.sources {
            let id = self.resolve_id(*source);
            let before = figs.len();

            for pair in source.pairs() {
                let (key, value) = pair.inspect_err(|e| {
                    tracing::debug!(source = %id, error = %e, "source drain aborted");
                })?;
                if seen.contains(&key) {
                    continue;
                }
                seen.insert(key.clone());
                figs.push(Fig::new(key, value, id.clone()));
            }

            tracing::trace!(source = %id, keys = figs.len() - before, "drained source");
        }

        Ok(figs)
    }

    /// Drain all sources, then commit the result into `store`.
    ///
    /// Returns the number of keys committed. Nothing is committed if any source
    /// fails.
    pub fn load_into(&self, store: &FigStore) -> Result<usize> {
        let figs = self.drain()?;
        let count = figs.len();
        store.commit(figs);

        tracing::debug!(
            sources = self.sources.len(),
            keys = count,
            name = self.name.as_deref().unwrap_or(""),
            "committed load"
        );
        Ok(count)
    }

    /// Source identities in precedence order.
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| self.resolve_id(*s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::error::ConfigError;
    use crate::sources::{MemorySource, Pairs};

    struct FailingSource;

    impl Source for FailingSource {
        fn pairs(&self) -> Pairs<'_> {
            Box::new(
                vec![
                    Ok(("ok".to_string(), Value::from("1"))),
                    Err(ConfigError::argument("--bad", "missing '='")),
                ]
                .into_iter(),
            )
        }

        fn id(&self) -> SourceId {
            SourceId::reader("args")
        }
    }

    #[test]
    fn test_empty_loader() {
        let figs = Loader::new().drain().unwrap();
        assert!(figs.is_empty());
    }

    #[test]
    fn test_first_source_wins() {
        let a = MemorySource::from_pairs([("k", "a")]);
        let b = MemorySource::from_pairs([("k", "b"), ("other", "b")]);

        let figs = Loader::new().add_source(&a).add_source(&b).drain().unwrap();
        assert_eq!(figs.len(), 2);
        assert_eq!(figs[0].value().as_str(), Some("a"));
        assert_eq!(figs[1].key(), "other");
    }

    #[test]
    fn test_duplicate_within_one_source_keeps_first() {
        let a = MemorySource::from_pairs([("k", "first"), ("k", "second")]);
        let figs = Loader::new().add_source(&a).drain().unwrap();
        assert_eq!(figs.len(), 1);
        assert_eq!(figs[0].value().as_str(), Some("first"));
    }

    #[test]
    fn test_named_applies_to_generic_only() {
        let a = MemorySource::from_pairs([("x", "1")]);
        let b = FailingSource;
        let ids = Loader::new().add_source(&a).add_source(&b).named("startup").source_ids();
        assert_eq!(ids, vec![SourceId::generic("startup"), SourceId::reader("args")]);
    }

    #[test]
    fn test_error_aborts_without_commit() {
        let store = FigStore::new();
        let good = MemorySource::from_pairs([("before", "1")]);
        let result = Loader::new().add_source(&good).add_source(&FailingSource).load_into(&store);

        assert!(matches!(result, Err(ConfigError::ArgumentError { .. })));
        assert!(store.is_empty());
    }
}
