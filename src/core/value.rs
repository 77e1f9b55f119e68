//! Configuration values.

use crate::error::{ConfigError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Map of child keys to values, as produced by the structured readers.
pub type Table = BTreeMap<String, Value>;

/// A configuration value: either a raw scalar or a nested map.
///
/// Scalars keep their literal text. JSON `true`, `null` and `3.5` are all stored
/// as the strings `"true"`, `"null"` and `"3.5"`; no type coercion happens.
///
/// # Examples
///
/// ```rust
/// use figstore::core::Value;
///
/// let port = Value::from(8080);
/// assert_eq!(port.as_str(), Some("8080"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A leaf value in its literal textual form.
    Scalar(String),
    /// A map of child keys to values.
    Nested(Table),
}

impl Value {
    /// The scalar text, or `None` for nested values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Nested(_) => None,
        }
    }

    /// The nested map, or `None` for scalars.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Scalar(_) => None,
            Self::Nested(map) => Some(map),
        }
    }

    /// Whether this is a nested map.
    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_))
    }

    /// Look up a direct child of a nested value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_table().and_then(|map| map.get(key))
    }

    /// Follow a dotted path (`a.b.c`) into nested maps.
    ///
    /// An empty path returns the value itself.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError` if a step names a missing key or passes
    /// through a scalar.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use figstore::core::Value;
    /// use std::collections::BTreeMap;
    ///
    /// let mut inner = BTreeMap::new();
    /// inner.insert("c".to_string(), Value::from("2"));
    /// let mut root = BTreeMap::new();
    /// root.insert("b".to_string(), Value::Nested(inner));
    ///
    /// let tree = Value::Nested(root);
    /// assert_eq!(tree.navigate("b.c").unwrap(), &Value::from("2"));
    /// ```
    pub fn navigate(&self, path: &str) -> Result<&Value> {
        if path.is_empty() {
            return Ok(self);
        }

        let mut current = self;
        let mut walked = String::new();
        for step in path.split('.') {
            if !walked.is_empty() {
                walked.push('.');
            }
            walked.push_str(step);

            let map = current.as_table().ok_or_else(|| {
                ConfigError::navigation(&walked, "parent is not a map")
            })?;
            current = map
                .get(step)
                .ok_or_else(|| ConfigError::navigation(&walked, format!("no key '{}'", step)))?;
        }
        Ok(current)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => f.write_str(s),
            Self::Nested(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<Table> for Value {
    fn from(map: Table) -> Self {
        Self::Nested(map)
    }
}

macro_rules! scalar_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Scalar(v.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(bool, char, i32, i64, u16, u32, u64, usize, f64);
