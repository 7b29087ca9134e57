//! One-shot export of the historical range page into a single CSV.

use std::path::PathBuf;

use crate::extract::extract_all_pages;
use crate::normalize::normalize;
use crate::source::DataSource;
use crate::store::OutputStore;
use crate::types::{ScrapeError, ScrapeResult, TradingDate};

/// Output stem for a range export, e.g. `history_2000_01_01_2025_09_15`.
pub fn history_stem(from: &TradingDate, to: &TradingDate) -> String {
    format!("history_{}_{}", from.file_stem(), to.file_stem())
}

/// Filter the range page to `from..=to`, read every page and write the
/// normalized result. Returns `None` when the range produced no rows.
pub async fn export_history<S>(
    source: &mut S,
    store: &OutputStore,
    from: &TradingDate,
    to: &TradingDate,
    max_pages: usize,
) -> ScrapeResult<Option<PathBuf>>
where
    S: DataSource + ?Sized,
{
    if from > to {
        return Err(ScrapeError::InvalidInput(format!(
            "range start {from} is after end {to}"
        )));
    }

    if !source.submit_range(from, to).await? {
        tracing::info!("Range page rendered no table for {from}..{to}");
        return Ok(None);
    }

    let table = extract_all_pages(source, max_pages).await?;
    let record = normalize(&table);
    if record.is_empty() {
        return Ok(None);
    }

    let path = store.write_named(&history_stem(from, to), &record)?;
    tracing::info!("Exported {} rows to {}", record.row_count(), path.display());
    Ok(Some(path))
}
