//! Environment readiness check.

use std::path::{Path, PathBuf};

use anyhow::Result;

use nepse_scrape::renderer::chromium::CHROMIUM_PATH_ENV;
use nepse_scrape::{find_chromium, OutputStore};

/// State of the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataDirState {
    /// Exists; holds this many day files.
    Ready { days: usize },
    /// Missing, but will be created on the first write.
    WillCreate,
    /// Exists but is not a directory, or cannot be read.
    Unusable(String),
}

pub fn check_data_dir(dir: &Path) -> DataDirState {
    if !dir.exists() {
        return DataDirState::WillCreate;
    }
    if !dir.is_dir() {
        return DataDirState::Unusable("not a directory".to_string());
    }
    match OutputStore::new(dir).scraped_dates() {
        Ok(dates) => DataDirState::Ready { days: dates.len() },
        Err(e) => DataDirState::Unusable(e.to_string()),
    }
}

/// Check Chromium availability and the output directory.
///
/// Returns whether a run could start.
pub fn run(data_dir: &Path, chromium: Option<PathBuf>) -> Result<bool> {
    println!("nepse-scrape doctor");
    println!("===================");
    println!();

    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let chromium_path = chromium.filter(|p| p.exists()).or_else(find_chromium);
    match &chromium_path {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Install Chrome/Chromium or set {CHROMIUM_PATH_ENV}."
        ),
    }

    let dir_state = check_data_dir(data_dir);
    match &dir_state {
        DataDirState::Ready { days } => println!(
            "[OK] Data directory {} ({days} days already scraped)",
            data_dir.display()
        ),
        DataDirState::WillCreate => println!(
            "[OK] Data directory {} will be created on first write",
            data_dir.display()
        ),
        DataDirState::Unusable(reason) => {
            println!("[!!] Data directory {} unusable: {reason}", data_dir.display())
        }
    }

    println!();
    let ready = chromium_path.is_some() && !matches!(dir_state, DataDirState::Unusable(_));
    if ready {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(ready)
}
