//! # Raw Parameter Stores
//!
//! The resolver reads raw request parameters through [`RawParameterStore`].
//! Parsing requests is left to whatever produced the store; [`ParameterMap`]
//! is the in-memory implementation used when the caller already has
//! name/value pairs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Read-only access to raw parameters.
///
/// Per-name value order must be the order the values were supplied in.
/// Stores are `Send` so a context can move to the task serving the request.
pub trait RawParameterStore: fmt::Debug + Send {
    /// Every parameter name present, in a stable order.
    fn names(&self) -> Vec<String>;

    /// All values for `name`, or `None` if the name is absent.
    fn values(&self, name: &str) -> Option<&[String]>;

    /// The first value for `name`.
    fn value(&self, name: &str) -> Option<&str> {
        self.values(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    fn contains(&self, name: &str) -> bool {
        self.values(name).is_some()
    }
}

/// Ordered multi-valued parameter map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterMap {
    params: BTreeMap<String, Vec<String>>,
}

impl ParameterMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs; repeated names accumulate in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (name, value) in pairs {
            map.append(name, value);
        }
        map
    }

    /// Replace all values for `name`.
    pub fn insert<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    /// Add one value after any existing values for `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl RawParameterStore for ParameterMap {
    fn names(&self) -> Vec<String> {
        self.params.keys().cloned().collect()
    }

    fn values(&self, name: &str) -> Option<&[String]> {
        self.params.get(name).map(Vec::as_slice)
    }
}

impl RawParameterStore for HashMap<String, Vec<String>> {
    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys().cloned().collect();
        names.sort();
        names
    }

    fn values(&self, name: &str) -> Option<&[String]> {
        self.get(name).map(Vec::as_slice)
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl From<HashMap<String, Vec<String>>> for ParameterMap {
    fn from(params: HashMap<String, Vec<String>>) -> Self {
        Self {
            params: params.into_iter().collect(),
        }
    }
}
