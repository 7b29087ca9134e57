//! Date range iteration and the closed-weekday rule.

use std::str::FromStr;

use chrono::{NaiveDate, Weekday};

use crate::types::{ScrapeError, TradingDate};

/// First day of the historical backfill.
pub fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

/// Inclusive, ascending range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: TradingDate,
    pub end: TradingDate,
}

impl DateRange {
    pub fn new(start: TradingDate, end: TradingDate) -> Self {
        Self { start, end }
    }

    pub fn iter(&self) -> DateIter {
        DateIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = TradingDate;
    type IntoIter = DateIter;

    fn into_iter(self) -> DateIter {
        self.iter()
    }
}

/// Lazily yields each day of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateIter {
    next: Option<TradingDate>,
    end: TradingDate,
}

impl Iterator for DateIter {
    type Item = TradingDate;

    fn next(&mut self) -> Option<TradingDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ();
        Some(current)
    }
}

/// Weekdays on which the exchange is treated as closed.
///
/// The default closes every day with a Monday-based index of 4 or more,
/// i.e. Friday, Saturday and Sunday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedDays {
    days: Vec<Weekday>,
}

impl ClosedDays {
    pub fn new(mut days: Vec<Weekday>) -> Self {
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        Self { days }
    }

    pub fn is_closed(&self, date: &TradingDate) -> bool {
        let idx = date.weekday_index();
        self.days.iter().any(|d| d.num_days_from_monday() == idx)
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }
}

impl Default for ClosedDays {
    fn default() -> Self {
        Self::new(vec![Weekday::Fri, Weekday::Sat, Weekday::Sun])
    }
}

impl FromStr for ClosedDays {
    type Err = ScrapeError;

    /// Parse a comma-separated weekday list such as `fri,sat,sun`.
    /// An empty string means every day is a trading day.
    fn from_str(s: &str) -> Result<Self, ScrapeError> {
        let mut days = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let day = part
                .parse::<Weekday>()
                .map_err(|_| ScrapeError::InvalidInput(format!("unknown weekday '{part}'")))?;
            days.push(day);
        }
        Ok(Self::new(days))
    }
}
