//! nepse-scrape — browser-driven scraper for daily NEPSE share price tables.
//!
//! One Chromium tab searches the share price page a day at a time, reads every
//! page of the results table, normalizes it and writes `data/YYYY_MM_DD.csv`.
//! Days that already have a file are never fetched again.

pub mod calendar;
pub mod config;
pub mod extract;
pub mod history;
pub mod normalize;
pub mod orchestrator;
pub mod renderer;
pub mod script;
pub mod source;
pub mod store;
pub mod submit;
pub mod types;
pub mod wait;

pub use calendar::{ClosedDays, DateRange};
pub use config::{RunConfig, SessionConfig, SiteConfig};
pub use extract::{extract_all_pages, parse_table};
pub use history::export_history;
pub use normalize::normalize;
pub use orchestrator::{process_day, run_days, NullObserver, RunObserver};
pub use renderer::{acquire, find_chromium, ChromiumSession, RenderContext};
pub use source::{BrowserSource, DataSource};
pub use store::OutputStore;
pub use types::*;
