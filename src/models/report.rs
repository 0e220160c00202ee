use serde::Serialize;

/// One scan run, addressed externally by `hashid`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(skip)]
    pub id: i32,
    pub hashid: String,
    pub url: String,
    /// RFC 3339 creation instant
    pub timestamp: String,
    pub alias: Option<String>,
    /// Raw payload as stored; see [`Report::json_results`].
    pub results: Option<String>,
    pub seo: Option<f64>,
    pub accessibility: Option<f64>,
    pub usability: Option<f64>,
    #[serde(skip)]
    pub user_id: i32,
}

impl Report {
    /// Parses the stored results payload.
    ///
    /// Returns `Ok(None)` while no results have been recorded. The payload is
    /// run through [`normalize_result_quotes`] first.
    pub fn json_results(&self) -> Result<Option<serde_json::Value>, serde_json::Error> {
        self.results
            .as_deref()
            .map(|raw| serde_json::from_str(&normalize_result_quotes(raw)))
            .transpose()
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.results.is_some()
    }
}

/// The scan engine writes its payload with single-quoted strings
/// (`{'a': 1}`). Every `'` is rewritten to `"` before JSON parsing.
///
/// Fragile: an apostrophe inside a string value (`"it's"`) becomes a stray
/// quote and the parse fails.
#[must_use]
pub fn normalize_result_quotes(raw: &str) -> String {
    raw.replace('\'', "\"")
}
