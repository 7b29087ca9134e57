//! Core data types for scraped share price tables and run outcomes.

use std::fmt;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar day in the scan range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TradingDate(NaiveDate);

impl TradingDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a `YYYY-MM-DD` string.
    pub fn parse(s: &str) -> ScrapeResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| ScrapeError::InvalidInput(format!("bad date '{s}': {e}")))
    }

    /// ISO form typed into the search page's date field.
    pub fn iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// File-safe form used for output names (`2024_01_31`).
    pub fn file_stem(&self) -> String {
        self.0.format("%Y_%m_%d").to_string()
    }

    /// US form (`01/31/2024`) used by the historical range page.
    pub fn us(&self) -> String {
        self.0.format("%m/%d/%Y").to_string()
    }

    /// Weekday index with Monday = 0.
    pub fn weekday_index(&self) -> u32 {
        self.0.weekday().num_days_from_monday()
    }

    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }
}

impl fmt::Display for TradingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iso())
    }
}

impl From<NaiveDate> for TradingDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// One rendered page of the results table: rows of trimmed cell text.
pub type RawPage = Vec<Vec<String>>;

/// Every page fetched for one date, concatenated in visitation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTable {
    pub rows: Vec<Vec<String>>,
}

impl DayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Append a page's rows after the rows already collected.
    pub fn append(&mut self, page: RawPage) {
        self.rows.extend(page);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// A cleaned table: named columns plus data rows of the same width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl NormalizedRecord {
    /// True when there is nothing worth persisting (no data rows).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header followed by data rows, the shape the normalizer consumes.
    pub fn to_table(&self) -> DayTable {
        if self.columns.is_empty() && self.rows.is_empty() {
            return DayTable::new();
        }
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(self.columns.clone());
        rows.extend(self.rows.iter().cloned());
        DayTable { rows }
    }
}

/// Why a date was passed over without touching the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Weekend,
    AlreadyScraped,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekend => write!(f, "market closed"),
            Self::AlreadyScraped => write!(f, "already scraped"),
        }
    }
}

/// Terminal state of one date in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    Skipped(SkipReason),
    Scraped { path: PathBuf, rows: usize },
    Empty,
    Failed(String),
}

/// Counts of every outcome in a run, plus the dates that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scraped: usize,
    pub empty: usize,
    pub skipped_weekend: usize,
    pub skipped_existing: usize,
    pub failed: Vec<(TradingDate, String)>,
}

impl RunSummary {
    pub fn record(&mut self, date: TradingDate, outcome: &DayOutcome) {
        match outcome {
            DayOutcome::Skipped(SkipReason::Weekend) => self.skipped_weekend += 1,
            DayOutcome::Skipped(SkipReason::AlreadyScraped) => self.skipped_existing += 1,
            DayOutcome::Scraped { .. } => self.scraped += 1,
            DayOutcome::Empty => self.empty += 1,
            DayOutcome::Failed(reason) => self.failed.push((date, reason.clone())),
        }
    }

    pub fn total(&self) -> usize {
        self.scraped + self.empty + self.skipped_weekend + self.skipped_existing + self.failed.len()
    }
}

/// Errors that can occur while driving the site or writing output.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("Browser could not be started: {0}")]
    DriverInit(String),

    #[error("Element '{selector}' not found after {waited_ms}ms")]
    ElementNotFound { selector: String, waited_ms: u64 },

    #[error("Results table '{selector}' not found after {waited_ms}ms")]
    TableNotFound { selector: String, waited_ms: u64 },

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Pagination stopped after {0} pages")]
    PageLimit(usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience result type.
pub type ScrapeResult<T> = Result<T, ScrapeError>;
