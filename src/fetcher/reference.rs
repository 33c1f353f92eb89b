//! # Spreadsheet References
//!
//! Clients may pass either a bare spreadsheet id or the browser URL of the
//! spreadsheet. Both normalize to the id.

use std::sync::OnceLock;

use regex::Regex;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("static spreadsheet url pattern")
    })
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static spreadsheet id pattern"))
}

/// Extract the spreadsheet id from an id or a spreadsheet URL.
///
/// Returns `None` when the input is neither.
pub fn normalize_spreadsheet_ref(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(caps) = url_pattern().captures(raw) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    if id_pattern().is_match(raw) {
        return Some(raw.to_string());
    }

    None
}
