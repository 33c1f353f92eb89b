//! # Response Envelope
//!
//! Every data route answers with the same envelope shape. Pagination and
//! filter fields appear only when the corresponding capability was in effect.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::filter::FilterSet;
use super::grid::Record;
use super::plan::QueryPlan;
use super::query::Page;
use super::sample::{SAMPLE_SPREADSHEET, SAMPLE_TAB};

/// Where the rows came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Spreadsheet,
    Sample,
}

/// Identifying block naming the source tab/spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub kind: SourceKind,
    /// Endpoint id, absent for ad-hoc requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub name: String,
    pub spreadsheet: String,
    pub tab: String,
}

impl SourceInfo {
    pub fn spreadsheet(
        endpoint: Option<String>,
        name: impl Into<String>,
        spreadsheet: impl Into<String>,
        tab: impl Into<String>,
    ) -> Self {
        Self {
            kind: SourceKind::Spreadsheet,
            endpoint,
            name: name.into(),
            spreadsheet: spreadsheet.into(),
            tab: tab.into(),
        }
    }

    /// Source block for the built-in sample dataset
    pub fn sample(endpoint: Option<String>, name: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Sample,
            endpoint,
            name: name.into(),
            spreadsheet: SAMPLE_SPREADSHEET.to_string(),
            tab: SAMPLE_TAB.to_string(),
        }
    }
}

/// Complete JSON response body for data routes
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub data: Vec<Record>,
    pub count: usize,
    pub total: usize,
    pub cached: bool,
    pub generated_at: String,
    pub source: SourceInfo,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(rename = "hasMore", skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters_applied: Option<FilterSet>,
}

/// Assemble the envelope for a page
pub fn compose(page: Page, plan: &QueryPlan, source: &SourceInfo, cached: bool) -> Envelope {
    let (offset, limit, has_more) = if plan.is_paginated() {
        (Some(page.offset), Some(page.limit), Some(page.has_more))
    } else {
        (None, None, None)
    };

    let (filtered, filters_applied) = if plan.is_filtered() {
        (Some(true), Some(plan.filters.clone()))
    } else {
        (None, None)
    };

    Envelope {
        count: page.records.len(),
        total: page.total,
        data: page.records,
        cached,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        source: source.clone(),
        offset,
        limit,
        has_more,
        filtered,
        filters_applied,
    }
}
