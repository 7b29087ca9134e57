//! Per-date CSV output directory.
//!
//! The presence of `<dir>/YYYY_MM_DD.csv` is the only state kept between
//! runs. Files are written to a temporary sibling and renamed into place, so
//! an interrupted write never leaves a file that would be mistaken for a
//! finished day.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{NormalizedRecord, ScrapeResult, TradingDate};

const EXTENSION: &str = "csv";

/// Directory of dated CSV snapshots.
#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Output path for a date, e.g. `data/2024_01_31.csv`.
    pub fn path_for(&self, date: &TradingDate) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", date.file_stem()))
    }

    pub fn exists(&self, date: &TradingDate) -> bool {
        self.path_for(date).is_file()
    }

    /// Persist a day's record and return the final path.
    pub fn write(&self, date: &TradingDate, record: &NormalizedRecord) -> ScrapeResult<PathBuf> {
        self.write_named(&date.file_stem(), record)
    }

    /// Persist a record under `<dir>/<stem>.csv`.
    pub fn write_named(&self, stem: &str, record: &NormalizedRecord) -> ScrapeResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!("{stem}.{EXTENSION}"));
        let tmp = self.dir.join(format!(".{stem}.{EXTENSION}.tmp"));

        let result = write_csv(&tmp, record);
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &path)?;

        tracing::debug!("Wrote {} rows to {}", record.row_count(), path.display());
        Ok(path)
    }

    /// Dates that already have an output file, in ascending order.
    pub fn scraped_dates(&self) -> ScrapeResult<Vec<TradingDate>> {
        let mut dates = Vec::new();
        if !self.dir.is_dir() {
            return Ok(dates);
        }
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(date) = TradingDate::parse(&stem.replace('_', "-")) {
                dates.push(date);
            }
        }
        dates.sort();
        Ok(dates)
    }
}

fn write_csv(path: &Path, record: &NormalizedRecord) -> ScrapeResult<()> {
    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    writer.write_record(&record.columns)?;
    for row in &record.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> NormalizedRecord {
        NormalizedRecord {
            columns: vec!["Symbol".into(), "Name".into()],
            rows: vec![
                vec!["NABIL".into(), "Nabil Bank, Ltd".into()],
                vec!["NICA".into(), "NIC \"Asia\"".into()],
            ],
        }
    }

    #[test]
    fn test_path_for() {
        let store = OutputStore::new("data");
        let d = TradingDate::parse("2024-01-31").unwrap();
        assert_eq!(store.path_for(&d), PathBuf::from("data/2024_01_31.csv"));
    }

    #[test]
    fn test_write_creates_dir_and_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path().join("nested/data"));
        let d = TradingDate::parse("2024-01-31").unwrap();
        assert!(!store.exists(&d));

        let path = store.write(&d, &record()).unwrap();
        assert!(store.exists(&d));

        let text = fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "Symbol,Name\nNABIL,\"Nabil Bank, Ltd\"\nNICA,\"NIC \"\"Asia\"\"\"\n"
        );
    }

    #[test]
    fn test_no_temp_file_left() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());
        let d = TradingDate::parse("2024-01-31").unwrap();
        store.write(&d, &record()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["2024_01_31.csv"]);
    }

    #[test]
    fn test_scraped_dates() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());
        assert!(store.scraped_dates().unwrap().is_empty());

        for s in ["2024-01-02", "2024-01-01"] {
            store.write(&TradingDate::parse(s).unwrap(), &record()).unwrap();
        }
        store.write_named("history_x", &record()).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let dates: Vec<_> = store.scraped_dates().unwrap().iter().map(|d| d.iso()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);
    }
}
