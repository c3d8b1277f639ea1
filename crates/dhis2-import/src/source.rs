//! Source CSV retrieval and parsing.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use csv::{ReaderBuilder, Trim};
use reqwest::Url;
use reqwest::blocking::Client;

use crate::error::{ImportError, Result};

/// Default location of the WHO TB data export.
pub const WHO_CSV_URL: &str = "https://extranet.who.int/tme/generateCSV.asp";

/// One CSV record keyed by header name.
pub type CsvRow = BTreeMap<String, String>;

/// Datasets published by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Variable catalogue: one row per variable.
    Dictionary,
    /// Country-year estimates.
    Estimates,
}

impl Dataset {
    /// Value of the `ds` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary",
            Self::Estimates => "estimates",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supplier of raw CSV text.
pub trait SourceData {
    /// Returns the full CSV document for `dataset`.
    fn fetch_csv(&self, dataset: Dataset) -> Result<String>;

    /// Fetches and parses `dataset`.
    fn fetch_rows(&self, dataset: Dataset) -> Result<Vec<CsvRow>> {
        let text = self.fetch_csv(dataset)?;
        read_csv_rows(&text).map_err(|source| ImportError::Csv {
            dataset: dataset.to_string(),
            source,
        })
    }
}

/// Downloads datasets from the WHO CSV export.
#[derive(Debug, Clone)]
pub struct WhoSource {
    http: Client,
    url: String,
}

impl WhoSource {
    /// Creates a source for the public endpoint.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Self::with_url(WHO_CSV_URL, timeout)
    }

    /// Creates a source for an alternative endpoint taking the same `ds`
    /// parameter.
    pub fn with_url(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let url = url.into();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImportError::SourceFetch {
                dataset: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { http, url })
    }

    /// Full request URL for `dataset`.
    pub fn dataset_url(&self, dataset: Dataset) -> Result<Url> {
        let mut url = Url::parse(&self.url).map_err(|e| ImportError::SourceFetch {
            dataset: dataset.to_string(),
            message: format!("invalid url '{}': {e}", self.url),
        })?;
        url.query_pairs_mut().append_pair("ds", dataset.as_str());
        Ok(url)
    }
}

impl SourceData for WhoSource {
    fn fetch_csv(&self, dataset: Dataset) -> Result<String> {
        let url = self.dataset_url(dataset)?;
        tracing::debug!(%dataset, %url, "fetching source data");
        let fetch_error = |e: reqwest::Error| ImportError::SourceFetch {
            dataset: dataset.to_string(),
            message: e.to_string(),
        };
        let text = self
            .http
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(fetch_error)?;
        tracing::debug!(%dataset, bytes = text.len(), "source data received");
        Ok(text)
    }
}

/// Parses comma-delimited CSV text with a header row into row maps.
///
/// Header names are trimmed and lose a leading byte order mark. Values are
/// kept exactly as written.
pub fn read_csv_rows(text: &str) -> std::result::Result<Vec<CsvRow>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = CsvRow::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .to_string();
            row.insert(key, value.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Returns a field value, or an empty string if the column is absent.
pub fn get_field(row: &CsvRow, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

/// Returns a field value, or `None` if the column is absent or empty.
pub fn get_optional(row: &CsvRow, key: &str) -> Option<String> {
    row.get(key).filter(|v| !v.is_empty()).cloned()
}
