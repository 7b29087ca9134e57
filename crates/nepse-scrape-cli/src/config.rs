//! Configuration resolution.

use std::path::PathBuf;

use nepse_scrape::config::DEFAULT_DATA_DIR;
use nepse_scrape::TradingDate;

/// Environment variable naming the output directory.
pub const DATA_DIR_ENV: &str = "NEPSE_DATA_DIR";

/// Resolve the output directory: explicit flag, then `NEPSE_DATA_DIR`, then `./data`.
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(DATA_DIR_ENV) {
        if !env_path.trim().is_empty() {
            return PathBuf::from(env_path);
        }
    }

    PathBuf::from(DEFAULT_DATA_DIR)
}

/// Today's local date, the default end of every range.
pub fn today() -> TradingDate {
    TradingDate::new(chrono::Local::now().date_naive())
}

/// `value_parser` for `YYYY-MM-DD` arguments.
pub fn parse_date(s: &str) -> Result<TradingDate, String> {
    TradingDate::parse(s).map_err(|e| e.to_string())
}

/// `value_parser` for page limits; zero would fail every multi-page day.
pub fn parse_max_pages(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
