//! Browser, site and run configuration with defaults for the target site.

use std::path::PathBuf;
use std::time::Duration;

use crate::calendar::{default_start, ClosedDays, DateRange};
use crate::types::TradingDate;
use crate::wait::WaitBudget;

/// Desktop Chrome user agent presented to the site.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const DEFAULT_PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);
pub const DEFAULT_MAX_PAGES: usize = 500;
pub const DEFAULT_DATA_DIR: &str = "data";

/// How the browser is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Explicit Chromium binary; located automatically when `None`.
    pub chromium_path: Option<PathBuf>,
    pub headless: bool,
    pub user_agent: String,
    pub page_load_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chromium_path: None,
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_load_timeout: DEFAULT_PAGE_LOAD_TIMEOUT,
        }
    }
}

/// Where things live on the target pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub search_url: String,
    /// CSS selector of the date field.
    pub date_input: String,
    /// CSS selector of the search button.
    pub submit_button: String,
    /// CSS selector of the results table.
    pub results_table: String,
    /// Text shown instead of the table when a date has no trading data.
    pub no_data_marker: String,
    /// Visible label of the pagination link.
    pub next_label: String,
    /// CSS selector of the date-picker popup that can cover the button.
    pub datepicker_overlay: String,
    pub history_url: String,
    /// CSS selector of the two range inputs, start first.
    pub history_inputs: String,
    /// CSS selector of the table the range page renders.
    pub history_table: String,
    /// Label of the button that applies the historical date range.
    pub history_filter_label: String,
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.sharesansar.com/today-share-price".to_string(),
            date_input: "input#fromdate".to_string(),
            submit_button: "#btn_todayshareprice_submit".to_string(),
            results_table: "table#headFixed".to_string(),
            no_data_marker: "Could not find floorsheet matching the search criteria".to_string(),
            next_label: "Next".to_string(),
            datepicker_overlay: ".datepicker-dropdown, .ui-datepicker".to_string(),
            history_url: "https://nepsealpha.com/nepse-data".to_string(),
            history_inputs: "input".to_string(),
            history_table: "table".to_string(),
            history_filter_label: "Filter".to_string(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl SiteConfig {
    pub fn wait_budget(&self) -> WaitBudget {
        WaitBudget::new(self.wait_timeout, self.poll_interval)
    }
}

/// What a backfill run covers and where it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub range: DateRange,
    pub data_dir: PathBuf,
    pub max_pages: usize,
    pub closed_days: ClosedDays,
}

impl RunConfig {
    /// Default run: 2000-01-01 through `today` into `./data`.
    pub fn until(today: TradingDate) -> Self {
        Self {
            range: DateRange::new(TradingDate::new(default_start()), today),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            max_pages: DEFAULT_MAX_PAGES,
            closed_days: ClosedDays::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = SessionConfig::default();
        assert!(s.headless);
        assert_eq!(s.page_load_timeout, Duration::from_secs(120));

        let site = SiteConfig::default();
        assert_eq!(site.wait_timeout, Duration::from_secs(20));
        assert_eq!(site.next_label, "Next");

        let today = TradingDate::parse("2024-06-01").unwrap();
        let run = RunConfig::until(today);
        assert_eq!(run.range.start.iso(), "2000-01-01");
        assert_eq!(run.range.end, today);
        assert_eq!(run.data_dir, PathBuf::from("data"));
    }
}
