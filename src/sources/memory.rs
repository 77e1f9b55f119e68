//! In-memory configuration source for untyped input.

use super::{Pair, Pairs, Source};
use crate::core::{SourceId, Value};
use std::collections::BTreeMap;

/// A source over caller-supplied pairs.
///
/// Values loaded from a `MemorySource` are tagged with a generic identity:
/// the name given via [`named`](Self::named), otherwise the input's shape
/// (`map` or `pairs`).
///
/// # Examples
///
/// ```rust
/// use figstore::sources::{MemorySource, Source};
///
/// let source = MemorySource::from_pairs([("debug", "true"), ("level", "3")]);
/// assert_eq!(source.id().to_string(), "pairs");
///
/// let source = source.named("defaults");
/// assert_eq!(source.id().to_string(), "defaults");
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    pairs: Vec<Pair>,
    label: String,
}

impl MemorySource {
    /// Build from an ordered list of pairs. Duplicate keys are kept; the first
    /// one wins when loaded.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            label: "pairs".to_string(),
        }
    }

    /// Build from a mapping. Duplicate keys collapse to the last value and
    /// pairs are produced in key order.
    pub fn from_map<K, V, I>(map: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let map: BTreeMap<String, Value> = map
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            pairs: map.into_iter().collect(),
            label: "map".to_string(),
        }
    }

    /// Label this input's values with `name` instead of its shape.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.label = name.into();
        self
    }

    /// Number of pairs held.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pairs are held.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Source for MemorySource {
    fn pairs(&self) -> Pairs<'_> {
        Box::new(self.pairs.iter().cloned().map(Ok))
    }

    fn id(&self) -> SourceId {
        SourceId::generic(self.label.clone())
    }
}
