//! Read-only view of call metadata used for per-call policy overrides

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use domain::CallMetadata;

/// Lookup of request headers by name
///
/// Header names compare case-insensitively in every implementation here.
pub trait MetadataView {
    /// Value of header `key`, if present
    fn get(&self, key: &str) -> Option<&str>;
}

impl MetadataView for CallMetadata {
    fn get(&self, key: &str) -> Option<&str> {
        Self::get(self, key)
    }
}

impl<S: BuildHasher> MetadataView for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        Self::get(self, key)
            .or_else(|| find_ignore_case(self.iter(), key))
            .map(String::as_str)
    }
}

impl MetadataView for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        Self::get(self, key)
            .or_else(|| find_ignore_case(self.iter(), key))
            .map(String::as_str)
    }
}

fn find_ignore_case<'m>(
    mut entries: impl Iterator<Item = (&'m String, &'m String)>,
    key: &str,
) -> Option<&'m String> {
    entries
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}

impl MetadataView for [(&str, &str)] {
    fn get(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| *value)
    }
}
