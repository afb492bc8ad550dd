//! # Handler Mappings
//!
//! Parameter name to handler identifier mappings, the unit of configuration
//! for both the default registry and per-context overrides.

use crate::error::{BindingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Opaque reference naming an installable handler, e.g. `"app::CustomerHandler"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerId(String);

impl HandlerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HandlerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for HandlerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Mapping from parameter name to handler identifier.
///
/// Entries are kept sorted by parameter name so introspection output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerMapping {
    entries: BTreeMap<String, HandlerId>,
}

impl HandlerMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_handler(mut self, name: impl Into<String>, id: impl Into<HandlerId>) -> Self {
        self.insert(name, id);
        self
    }

    /// Insert an entry, returning the identifier it replaced.
    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<HandlerId>) -> Option<HandlerId> {
        self.entries.insert(name.into(), id.into())
    }

    pub fn get(&self, name: &str) -> Option<&HandlerId> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HandlerId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), id))
    }

    /// Distinct handler identifiers referenced by this mapping.
    pub fn handler_ids(&self) -> BTreeSet<&HandlerId> {
        self.entries.values().collect()
    }

    /// Keep only the entries whose parameter name is in `names`.
    pub fn retain_names<S: AsRef<str>>(&mut self, names: &[S]) {
        self.entries
            .retain(|name, _| names.iter().any(|wanted| wanted.as_ref() == name.as_str()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merge `other` into this mapping; entries from `other` win.
    pub fn extend(&mut self, other: HandlerMapping) {
        self.entries.extend(other.entries);
    }

    /// Build a mapping from untyped input.
    ///
    /// Only a non-empty JSON object whose values are all strings is accepted.
    /// `null`, arrays, scalars and `{}` are rejected alike: an empty mapping
    /// is indistinguishable from no mapping at all.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = match value {
            serde_json::Value::Object(object) => object,
            serde_json::Value::Null => {
                return Err(BindingError::configuration(
                    "No handler mapping supplied",
                ))
            }
            other => {
                return Err(BindingError::configuration(format!(
                    "Handler mapping must be a name => handler map, got {}",
                    json_kind(other)
                )))
            }
        };

        let mut mapping = Self::new();
        for (name, id) in object {
            validate_param_name(name)?;
            let id = id.as_str().ok_or_else(|| {
                BindingError::configuration(format!(
                    "Handler for parameter '{name}' must be a string, got {}",
                    json_kind(id)
                ))
            })?;
            if id.trim().is_empty() {
                return Err(BindingError::configuration(format!(
                    "Handler for parameter '{name}' must not be empty"
                )));
            }
            mapping.insert(name.clone(), id);
        }

        mapping.ensure_not_empty()?;
        Ok(mapping)
    }

    pub(crate) fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(BindingError::configuration(
                "Handler mapping must contain at least one entry",
            ));
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for HandlerMapping
where
    K: Into<String>,
    V: Into<HandlerId>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, id)| (name.into(), id.into()))
                .collect(),
        }
    }
}

/// Reject parameter names that can never appear in a request.
pub(crate) fn validate_param_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(BindingError::configuration(
            "Parameter names in a handler mapping must not be empty",
        ));
    }
    Ok(())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "a map",
    }
}
