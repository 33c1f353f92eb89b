//! # Grid Flattening
//!
//! Converts a raw header+rows grid into an ordered collection of records.
//!
//! Row 0 is the header row. Every data row is read against it: short rows pad
//! with empty strings, cells past the last header are dropped. Values are
//! always strings; no type inference is performed.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Raw 2-D cell data as returned by the spreadsheet provider
pub type Grid = Vec<Vec<String>>;

/// One flattened row: header name -> cell value
///
/// Keys keep header order. A duplicate header overwrites the earlier value
/// in place, so the key stays at its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Records derived 1:1 from the data rows of a grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    /// `None` when the grid had no rows at all
    headers: Option<Vec<String>>,
    records: Vec<Record>,
}

impl Collection {
    /// The grid had zero rows, not even a header row
    pub fn is_empty_source(&self) -> bool {
        self.headers.is_none()
    }

    /// Header row, empty for an empty grid
    pub fn headers(&self) -> &[String] {
        self.headers.as_deref().unwrap_or(&[])
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Flatten a grid into records
pub fn flatten(grid: &[Vec<String>]) -> Collection {
    let Some((header_row, rows)) = grid.split_first() else {
        return Collection::default();
    };

    let records = rows
        .iter()
        .map(|row| {
            header_row
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    (header.as_str(), cell)
                })
                .collect()
        })
        .collect();

    Collection {
        headers: Some(header_row.clone()),
        records,
    }
}
