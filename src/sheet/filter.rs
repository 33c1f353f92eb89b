//! # Column Filters
//!
//! A `FilterSet` maps column names to match strings. A record matches when
//! every entry's value is a case-insensitive substring of the record's cell
//! for that column. A record without the column never matches.

use std::collections::BTreeMap;

use serde::Serialize;

use super::grid::Record;

/// Query keys that control pagination and are never filters
pub const RESERVED_PARAMS: [&str; 2] = ["limit", "offset"];

/// Column-value filters combined with AND logic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: BTreeMap<String, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw query pairs, skipping reserved keys.
    ///
    /// When a key repeats, the last value wins.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let filters = params
            .into_iter()
            .filter(|(k, _)| !RESERVED_PARAMS.contains(k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { filters }
    }

    /// Add a filter
    pub fn and(mut self, column: impl Into<String>, needle: impl Into<String>) -> Self {
        self.filters.insert(column.into(), needle.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if a record matches every filter
    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|(column, needle)| match record.get(column) {
            Some(cell) => contains_ignore_case(cell, needle),
            None => false,
        })
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
