//! # Google Sheets Provider
//!
//! `SheetProvider` over the Sheets v4 REST API. Only read calls are made.

use futures_util::future::BoxFuture;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::sheet::Grid;

use super::config::ProviderConfig;
use super::errors::{ProviderError, ProviderResult};
use super::provider::{SheetProvider, SpreadsheetMeta, TabInfo};

/// Field mask for metadata requests
const METADATA_FIELDS: &str = "properties.title,sheets.properties(title,index)";

/// Sheets v4 client
#[derive(Debug, Clone)]
pub struct GoogleSheetsProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResource {
    #[serde(default)]
    properties: SpreadsheetProperties,
    #[serde(default)]
    sheets: Vec<SheetResource>,
}

#[derive(Debug, Default, Deserialize)]
struct SpreadsheetProperties {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetResource {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GoogleSheetsProvider {
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ProviderError::Malformed(format!("Invalid provider base_url: {}", e)))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ProviderError::Malformed("provider base_url cannot carry a path".into()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ProviderResult<T> {
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Malformed(e.to_string())
            }
        })
    }
}

impl SheetProvider for GoogleSheetsProvider {
    fn values<'a>(&'a self, spreadsheet_id: &'a str, tab: &'a str) -> BoxFuture<'a, ProviderResult<Grid>> {
        Box::pin(async move {
            let range = quote_tab(tab);
            let url = self.endpoint(&["v4", "spreadsheets", spreadsheet_id, "values", &range])?;
            let body: ValueRange = self.get_json(url).await?;

            Ok(body
                .values
                .into_iter()
                .map(|row| row.into_iter().map(cell_to_string).collect())
                .collect())
        })
    }

    fn metadata<'a>(&'a self, spreadsheet_id: &'a str) -> BoxFuture<'a, ProviderResult<SpreadsheetMeta>> {
        Box::pin(async move {
            let mut url = self.endpoint(&["v4", "spreadsheets", spreadsheet_id])?;
            url.query_pairs_mut().append_pair("fields", METADATA_FIELDS);
            let body: SpreadsheetResource = self.get_json(url).await?;

            let mut tabs: Vec<TabInfo> = body
                .sheets
                .into_iter()
                .map(|s| TabInfo {
                    name: s.properties.title,
                    index: s.properties.index,
                })
                .collect();
            tabs.sort_by_key(|t| t.index);

            Ok(SpreadsheetMeta {
                title: body.properties.title,
                tabs,
            })
        })
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(err.to_string())
    }
}

/// A1 range covering a whole tab; quotes inside the name are doubled
fn quote_tab(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Provider error message, falling back to the status reason
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown status").to_string())
}
