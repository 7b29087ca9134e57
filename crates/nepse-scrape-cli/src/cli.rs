//! Command-line definition.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use nepse_scrape::calendar::{default_start, ClosedDays, DateRange};
use nepse_scrape::config::DEFAULT_MAX_PAGES;
use nepse_scrape::{RunConfig, SessionConfig, TradingDate};

use crate::config::{parse_date, parse_max_pages, resolve_data_dir};

#[derive(Parser, Debug)]
#[command(
    name = "nepse-scrape",
    about = "Backfill daily NEPSE share price tables into per-day CSV files",
    version
)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run; a bare invocation is `run` with defaults.
    pub fn command_or_default(self) -> Commands {
        self.command.unwrap_or(Commands::Run(RunArgs::default()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape every missing trading day into DATA_DIR/YYYY_MM_DD.csv (default).
    Run(RunArgs),

    /// Export the historical range page into a single CSV.
    History(HistoryArgs),

    /// Check Chromium availability and the data directory.
    Doctor {
        /// Output directory to check.
        #[arg(long)]
        data_dir: Option<String>,

        /// Chromium binary to check instead of searching for one.
        #[arg(long)]
        chromium: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   nepse-scrape completions bash > ~/.local/share/bash-completion/completions/nepse-scrape
    ///   nepse-scrape completions zsh > ~/.zfunc/_nepse-scrape
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

/// How to start the browser.
#[derive(Args, Debug, Default, Clone)]
pub struct BrowserArgs {
    /// Chromium binary (also NEPSE_CHROMIUM_PATH; searched on PATH otherwise).
    #[arg(long)]
    pub chromium: Option<PathBuf>,

    /// Show the browser window instead of running headless.
    #[arg(long)]
    pub headful: bool,
}

impl BrowserArgs {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            chromium_path: self.chromium.clone(),
            headless: !self.headful,
            ..SessionConfig::default()
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// First date to consider, YYYY-MM-DD [default: 2000-01-01].
    #[arg(long, value_parser = parse_date)]
    pub from: Option<TradingDate>,

    /// Last date to consider, YYYY-MM-DD [default: today].
    #[arg(long, value_parser = parse_date)]
    pub to: Option<TradingDate>,

    /// Output directory (also NEPSE_DATA_DIR) [default: ./data].
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Give up on a date after this many result pages [default: 500].
    #[arg(long, value_parser = parse_max_pages)]
    pub max_pages: Option<usize>,

    /// Weekdays never searched, comma separated [default: fri,sat,sun].
    #[arg(long)]
    pub closed_days: Option<String>,

    #[command(flatten)]
    pub browser: BrowserArgs,
}

impl RunArgs {
    /// Build the run configuration, filling unset values from defaults.
    pub fn run_config(&self, today: TradingDate) -> Result<RunConfig> {
        let start = self.from.unwrap_or_else(|| TradingDate::new(default_start()));
        let end = self.to.unwrap_or(today);
        if start > end {
            bail!("--from {start} is after --to {end}");
        }

        let closed_days = match &self.closed_days {
            Some(list) => list
                .parse::<ClosedDays>()
                .with_context(|| format!("invalid --closed-days '{list}'"))?,
            None => ClosedDays::default(),
        };

        Ok(RunConfig {
            range: DateRange::new(start, end),
            data_dir: resolve_data_dir(self.data_dir.as_deref()),
            max_pages: self.max_pages.unwrap_or(DEFAULT_MAX_PAGES),
            closed_days,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Start of the range, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    pub from: TradingDate,

    /// End of the range, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    pub to: TradingDate,

    /// Output directory (also NEPSE_DATA_DIR) [default: ./data].
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Give up after this many result pages [default: 500].
    #[arg(long, value_parser = parse_max_pages)]
    pub max_pages: Option<usize>,

    #[command(flatten)]
    pub browser: BrowserArgs,
}

impl HistoryArgs {
    pub fn data_dir(&self) -> PathBuf {
        resolve_data_dir(self.data_dir.as_deref())
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages.unwrap_or(DEFAULT_MAX_PAGES)
    }
}
