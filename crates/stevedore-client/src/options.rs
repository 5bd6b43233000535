//! Option bags passed to client operations.

use serde_json::{Map, Value};

/// A bag of named option values, as accepted by every client operation.
///
/// Values are JSON values and are forwarded to the daemon verbatim, so the
/// caller is responsible for supplying well-typed values.
///
/// ```
/// use stevedore_client::Options;
///
/// let opts = Options::new().set("all", true).set("limit", 5);
/// assert_eq!(opts.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options(Map<String, Value>);

impl Options {
    /// Creates an empty option bag.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds or replaces an option, returning the bag.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.0.insert(key.into(), value.into());
        self
    }

    /// Adds or replaces an option in place, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes an option, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns the value of an option, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the bag carries `key`, whatever its value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of options in the bag.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
