//! Lazy key-remapping and key-filtering wrappers around other sources.

use super::{Pairs, Source};
use crate::core::SourceId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

type KeyFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
type KeyPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// How a single key is renamed by a [`Remap`] table.
#[derive(Clone)]
pub enum Rename {
    /// Replace the key with a literal.
    To(String),
    /// Compute the new key from the old one.
    With(KeyFn),
}

impl Rename {
    /// Rename via a function.
    pub fn with(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self::With(Arc::new(f))
    }

    fn apply(&self, key: &str) -> String {
        match self {
            Self::To(new_key) => new_key.clone(),
            Self::With(f) => f(key),
        }
    }
}

impl From<&str> for Rename {
    fn from(key: &str) -> Self {
        Self::To(key.to_string())
    }
}

impl From<String> for Rename {
    fn from(key: String) -> Self {
        Self::To(key)
    }
}

#[derive(Clone)]
enum Mapping {
    Function(KeyFn),
    Table { table: HashMap<String, Rename>, select: bool },
}

/// Renames the keys produced by another source.
///
/// Keys are transformed as pairs are pulled; nothing is buffered.
///
/// # Examples
///
/// ```rust
/// use figstore::sources::{EnvSource, Remap, Source};
///
/// let env = EnvSource::new([("APP_PORT", "80"), ("HOME", "/root")]);
/// let source = Remap::table(env, [("APP_PORT", "port")]).select_only();
/// let keys: Vec<String> = source.pairs().map(|p| p.unwrap().0).collect();
/// assert_eq!(keys, ["port"]);
/// ```
#[derive(Clone)]
pub struct Remap<S> {
    inner: S,
    mapping: Mapping,
}

impl<S: Source> Remap<S> {
    /// Rename every key with `f`.
    pub fn with_fn(inner: S, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            inner,
            mapping: Mapping::Function(Arc::new(f)),
        }
    }

    /// Rename keys listed in `table`; other keys pass through unchanged.
    pub fn table<K, R, I>(inner: S, table: I) -> Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<Rename>,
    {
        Self {
            inner,
            mapping: Mapping::Table {
                table: table.into_iter().map(|(k, r)| (k.into(), r.into())).collect(),
                select: false,
            },
        }
    }

    /// Drop keys that are not listed in the table.
    ///
    /// Has no effect on function mappings, which cover every key.
    pub fn select_only(mut self) -> Self {
        if let Mapping::Table { select, .. } = &mut self.mapping {
            *select = true;
        }
        self
    }

    fn map_key(&self, key: String) -> Option<String> {
        match &self.mapping {
            Mapping::Function(f) => Some(f(&key)),
            Mapping::Table { table, select } => match table.get(&key) {
                Some(rename) => Some(rename.apply(&key)),
                None if *select => None,
                None => Some(key),
            },
        }
    }
}

impl<S: Source> Source for Remap<S> {
    fn pairs(&self) -> Pairs<'_> {
        Box::new(self.inner.pairs().filter_map(move |pair| match pair {
            Ok((key, value)) => self.map_key(key).map(|key| Ok((key, value))),
            Err(e) => Some(Err(e)),
        }))
    }

    fn id(&self) -> SourceId {
        self.inner.id()
    }
}

#[derive(Clone)]
enum Predicate {
    Function(KeyPredicate),
    Allowed(HashSet<String>),
}

/// Passes through only the pairs of another source whose key is accepted.
///
/// # Examples
///
/// ```rust
/// use figstore::sources::{Filter, MemorySource, Source};
///
/// let source = Filter::new(
///     MemorySource::from_pairs([("db.host", "x"), ("log.level", "info")]),
///     |key| key.starts_with("db."),
/// );
/// assert_eq!(source.pairs().count(), 1);
/// ```
#[derive(Clone)]
pub struct Filter<S> {
    inner: S,
    predicate: Predicate,
}

impl<S: Source> Filter<S> {
    /// Keep keys for which `predicate` returns true.
    pub fn new(inner: S, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            inner,
            predicate: Predicate::Function(Arc::new(predicate)),
        }
    }

    /// Keep only the listed keys.
    pub fn allow<K: Into<String>>(inner: S, keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            inner,
            predicate: Predicate::Allowed(keys.into_iter().map(Into::into).collect()),
        }
    }

    fn accepts(&self, key: &str) -> bool {
        match &self.predicate {
            Predicate::Function(f) => f(key),
            Predicate::Allowed(keys) => keys.contains(key),
        }
    }
}

impl<S: Source> Source for Filter<S> {
    fn pairs(&self) -> Pairs<'_> {
        Box::new(self.inner.pairs().filter(move |pair| match pair {
            Ok((key, _)) => self.accepts(key),
            Err(_) => true,
        }))
    }

    fn id(&self) -> SourceId {
        self.inner.id()
    }
}

/// Combinators for wrapping any [`Source`].
pub trait SourceExt: Source + Sized {
    /// Rename every key with `f`.
    fn remap_keys(self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Remap<Self> {
        Remap::with_fn(self, f)
    }

    /// Rename the keys listed in `table`, passing others through.
    fn rename<K, R, I>(self, table: I) -> Remap<Self>
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<Rename>,
    {
        Remap::table(self, table)
    }

    /// Keep keys for which `predicate` returns true.
    fn filter_keys(self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Filter<Self> {
        Filter::new(self, predicate)
    }

    /// Keep only the listed keys.
    fn only<K: Into<String>>(self, keys: impl IntoIterator<Item = K>) -> Filter<Self> {
        Filter::allow(self, keys)
    }
}

impl<S: Source> SourceExt for S {}
