//! # Fetch Errors
//!
//! `ProviderError` is what a provider client observed; `FetchError` is the
//! normalized kind callers act on.

use thiserror::Error;

/// Result type for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result type for fetcher operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Raw provider failure
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Provider request timed out")]
    Timeout,

    #[error("Provider transport error: {0}")]
    Transport(String),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// Normalized fetch failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Spreadsheet or tab not found: {0}")]
    SheetNotFound(String),

    #[error("Spreadsheet provider unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl FetchError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            FetchError::AccessDenied(_) => 403,
            FetchError::SheetNotFound(_) => 404,
            FetchError::UpstreamUnavailable(_) => 502,
        }
    }

    /// Stable kind string for logs and error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::AccessDenied(_) => "ACCESS_DENIED",
            FetchError::SheetNotFound(_) => "SHEET_NOT_FOUND",
            FetchError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
        }
    }
}

/// Marker the provider uses when a range names a tab that does not exist
const UNKNOWN_RANGE_MARKER: &str = "unable to parse range";

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Status { status: 401 | 403, message } => FetchError::AccessDenied(message),
            ProviderError::Status { status: 404, message } => FetchError::SheetNotFound(message),
            ProviderError::Status { status: 400, message }
                if message.to_lowercase().contains(UNKNOWN_RANGE_MARKER) =>
            {
                FetchError::SheetNotFound(message)
            }
            other => FetchError::UpstreamUnavailable(other.to_string()),
        }
    }
}
