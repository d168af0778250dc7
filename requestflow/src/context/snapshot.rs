//! Exportable context values for crossing execution boundaries.

use crate::request::{CachedResponse, InboundRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One exportable context field together with its value.
///
/// Imports apply values as direct field assignments over an enumerated set
/// of fields; nothing outside this enum can be touched by an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ContextValue {
    /// The bound request. Imported without running before-hooks.
    Request(Option<InboundRequest>),
    /// The merged cache lifetime.
    CacheTime(Option<Duration>),
    /// The routing prefix.
    Prefix(Option<String>),
    /// The cached response map used for cookie extraction.
    CachedHttpResponses(BTreeMap<String, CachedResponse>),
    /// The accumulated flag markers.
    Flags(Vec<String>),
}

/// An ordered collection of exported context values.
///
/// Applying the collection to a context assigns each value in order, so a
/// later entry for the same field wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextValues {
    values: Vec<ContextValue>,
}

impl ContextValues {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value.
    #[must_use]
    pub fn with(mut self, value: ContextValue) -> Self {
        self.values.push(value);
        self
    }

    /// Appends a value in place.
    pub fn push(&mut self, value: ContextValue) {
        self.values.push(value);
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the values in order.
    pub fn iter(&self) -> impl Iterator<Item = &ContextValue> {
        self.values.iter()
    }
}

impl IntoIterator for ContextValues {
    type Item = ContextValue;
    type IntoIter = std::vec::IntoIter<ContextValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl FromIterator<ContextValue> for ContextValues {
    fn from_iter<T: IntoIterator<Item = ContextValue>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
