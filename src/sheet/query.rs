//! # Query Engine
//!
//! Applies a `FilterSet` and then limit/offset pagination to a record slice.
//! Total over its domain: malformed pagination degrades to defaults.

use serde::Serialize;

use super::filter::FilterSet;
use super::grid::Record;

/// Requested pagination window, after lenient parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl PageRequest {
    pub fn new(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self { limit, offset }
    }

    /// Parse raw `limit`/`offset` strings.
    ///
    /// Anything that is not a non-negative integer is treated as absent.
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self {
            limit: limit.and_then(parse_non_negative),
            offset: offset.and_then(parse_non_negative),
        }
    }

    /// Pull `limit`/`offset` out of raw query pairs (last occurrence wins)
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut limit = None;
        let mut offset = None;
        for (key, value) in params {
            match key {
                "limit" => limit = Some(value),
                "offset" => offset = Some(value),
                _ => {}
            }
        }
        Self::parse(limit, offset)
    }
}

fn parse_non_negative(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok()
}

/// One page of query results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub records: Vec<Record>,
    /// Count after filtering, before slicing
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Filter then paginate
pub fn query(records: &[Record], filters: &FilterSet, page: PageRequest) -> Page {
    let matched: Vec<&Record> = records.iter().filter(|r| filters.matches(r)).collect();

    let total = matched.len();
    let limit = page.limit.unwrap_or(total);
    let offset = page.offset.unwrap_or(0);

    let records = matched
        .into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();

    Page {
        records,
        total,
        limit,
        offset,
        has_more: offset.saturating_add(limit) < total,
    }
}
