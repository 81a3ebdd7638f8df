//! Per-call metadata (request headers)
//!
//! Header names are case-insensitive; they are stored lowercased.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Read-only view of the headers attached to an outgoing call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMetadata {
    entries: BTreeMap<String, String>,
}

impl CallMetadata {
    /// Empty metadata
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, builder style
    #[must_use]
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a header
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Look up a header by name
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        if key.bytes().any(|b| b.is_ascii_uppercase()) {
            self.entries
                .get(&key.to_ascii_lowercase())
                .map(String::as_str)
        } else {
            self.entries.get(key).map(String::as_str)
        }
    }

    /// Number of headers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no headers are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for CallMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}
