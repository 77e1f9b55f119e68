//! The aggregation store: key → append-only value history.

use crate::core::{Fig, Loader, SourceId, Table, Value};
use crate::error::{ConfigError, Result};
use crate::sources::Source;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Concurrency-safe map from key to the chronological history of its values.
///
/// Every read and write takes one internal lock for the duration of a map
/// lookup or append. Loading drains sources before the lock is taken, so slow
/// sources never stall readers.
///
/// Share between threads by wrapping in an `Arc`.
///
/// # Examples
///
/// ```rust
/// use figstore::prelude::*;
///
/// let store = FigStore::new();
/// let env = EnvSource::new([("PORT", "8080")]);
/// store.load(&[&env])?;
///
/// store.set("PORT", "9090");
///
/// assert_eq!(store.get("PORT")?.as_str(), Some("9090"));
/// assert_eq!(store.history("PORT").len(), 2);
/// assert_eq!(store.history("PORT")[0].source().to_string(), "env");
/// # Ok::<(), figstore::error::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct FigStore {
    figs: Mutex<HashMap<String, Vec<Fig>>>,
}

impl FigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain `sources` in order and commit the result as one call.
    ///
    /// Within the call the first source to produce a key wins. Returns the
    /// number of keys committed.
    ///
    /// # Errors
    ///
    /// Returns the first source error; the store is left untouched.
    pub fn load(&self, sources: &[&dyn Source]) -> Result<usize> {
        sources
            .iter()
            .fold(Loader::new(), |loader, s| loader.add_source(*s))
            .load_into(self)
    }

    /// Like [`load`](Self::load), labelling untyped sources with `name`.
    pub fn load_named(&self, name: &str, sources: &[&dyn Source]) -> Result<usize> {
        sources
            .iter()
            .fold(Loader::new().named(name), |loader, s| loader.add_source(*s))
            .load_into(self)
    }

    /// Append drained entries under the lock.
    pub(crate) fn commit(&self, figs: Vec<Fig>) {
        let mut map = self.figs.lock();
        for fig in figs {
            map.entry(fig.key().to_string()).or_default().push(fig);
        }
    }

    /// Current value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `KeyNotFound` if the key is absent.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.get_fig(key).map(Fig::into_value)
    }

    /// Current value for `key`, or `default` if absent.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).unwrap_or_else(|_| default.into())
    }

    /// Latest history entry (value plus provenance) for `key`.
    ///
    /// # Errors
    ///
    /// Returns `KeyNotFound` if the key is absent.
    pub fn get_fig(&self, key: &str) -> Result<Fig> {
        self.figs
            .lock()
            .get(key)
            .and_then(|history| history.last())
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }

    /// Full history for `key`, oldest first. Empty if the key is absent.
    pub fn history(&self, key: &str) -> Vec<Fig> {
        self.figs.lock().get(key).cloned().unwrap_or_default()
    }

    /// Append `fig` to the history of `key`.
    ///
    /// The entry is recorded under `key`: a differing [`Fig::key`] is replaced
    /// so every history entry reports the key it is filed under.
    pub fn set_fig(&self, key: impl Into<String>, fig: Fig) {
        let key = key.into();
        let fig = fig.with_key(key.clone());
        self.figs.lock().entry(key).or_default().push(fig);
    }

    /// Manually override `key`, recorded with the `manual` source tag.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let fig = Fig::new(key.clone(), value, SourceId::reader("manual"));
        self.set_fig(key, fig);
    }

    /// Remove `key` and its entire history. Returns whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.figs.lock().remove(key).is_some()
    }

    /// Remove every key.
    pub fn clear(&self) {
        self.figs.lock().clear();
    }

    /// Whether `key` has a value.
    pub fn contains(&self, key: &str) -> bool {
        self.figs.lock().contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.figs.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.figs.lock().len()
    }

    /// Whether the store has no keys.
    pub fn is_empty(&self) -> bool {
        self.figs.lock().is_empty()
    }

    /// Current value of every key.
    pub fn snapshot(&self) -> Table {
        self.figs
            .lock()
            .iter()
            .filter_map(|(key, history)| {
                history.last().map(|fig| (key.clone(), fig.value().clone()))
            })
            .collect()
    }
}
