//! # Capability-Gated Query Plans
//!
//! Filtering and pagination are enabled per endpoint. A plan is built from the
//! raw query pairs and the endpoint's capabilities; disabled capabilities drop
//! the corresponding parameters even when the client supplied them.

use super::filter::FilterSet;
use super::grid::Record;
use super::query::{query, Page, PageRequest};

/// Features an endpoint exposes to its clients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub filters: bool,
    pub pagination: bool,
}

impl Capabilities {
    pub fn new(filters: bool, pagination: bool) -> Self {
        Self { filters, pagination }
    }

    /// Both capabilities on, used by the search routes
    pub fn all() -> Self {
        Self::new(true, true)
    }
}

/// What will actually be applied for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    pub capabilities: Capabilities,
    pub filters: FilterSet,
    pub page: PageRequest,
}

impl QueryPlan {
    pub fn from_params(params: &[(String, String)], capabilities: Capabilities) -> Self {
        let pairs = || params.iter().map(|(k, v)| (k.as_str(), v.as_str()));

        let filters = if capabilities.filters {
            FilterSet::from_params(pairs())
        } else {
            FilterSet::new()
        };
        let page = if capabilities.pagination {
            PageRequest::from_params(pairs())
        } else {
            PageRequest::default()
        };

        Self {
            capabilities,
            filters,
            page,
        }
    }

    /// Filtering is active and at least one filter was supplied
    pub fn is_filtered(&self) -> bool {
        self.capabilities.filters && !self.filters.is_empty()
    }

    pub fn is_paginated(&self) -> bool {
        self.capabilities.pagination
    }

    pub fn execute(&self, records: &[Record]) -> Page {
        query(records, &self.filters, self.page)
    }
}
