use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date layout used by the dataset, the permalink route and the lookup key.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One calendar entry of `quotes.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub author: String,
    #[serde(rename = "quote", default)]
    pub text: String,
    #[serde(default)]
    pub contributor: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub source_url: String,
}

impl Quote {
    /// Parses `date` as `YYYY-MM-DD`; `None` when it does not.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// A quote together with the calendar date its `date` field parsed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedQuote {
    pub date: NaiveDate,
    pub quote: Quote,
}

/// `contributors.json`: contributor identifier to display URL.
pub type ContributorDirectory = BTreeMap<String, String>;

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a canonical `YYYY-MM-DD` date. Forms chrono tolerates but that do
/// not format back to the same string (`2024-1-5`, `+2024-12-01`) are rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .filter(|date| format_date(*date) == raw)
}
