//! The day loop: decide, scrape, normalize and persist one date at a time.

use crate::config::RunConfig;
use crate::extract::extract_all_pages;
use crate::normalize::normalize;
use crate::source::DataSource;
use crate::store::OutputStore;
use crate::types::{DayOutcome, RunSummary, ScrapeResult, SkipReason, TradingDate};

/// Receives every state transition of a run.
pub trait RunObserver: Send {
    /// A date is about to be fetched from the site.
    fn day_started(&mut self, _date: &TradingDate) {}

    /// A date reached its final state.
    fn day_finished(&mut self, _date: &TradingDate, _outcome: &DayOutcome) {}

    /// Called once after the last date.
    fn run_finished(&mut self, _summary: &RunSummary) {}
}

/// An observer that ignores everything.
pub struct NullObserver;
impl RunObserver for NullObserver {}

/// Decide whether a date needs fetching at all. No network, no writes.
pub fn precheck(config: &RunConfig, store: &OutputStore, date: &TradingDate) -> Option<SkipReason> {
    if config.closed_days.is_closed(date) {
        Some(SkipReason::Weekend)
    } else if store.exists(date) {
        Some(SkipReason::AlreadyScraped)
    } else {
        None
    }
}

/// Fetch, normalize and persist a single date.
pub async fn process_day<S>(
    source: &mut S,
    store: &OutputStore,
    date: &TradingDate,
    max_pages: usize,
) -> ScrapeResult<DayOutcome>
where
    S: DataSource + ?Sized,
{
    if !source.submit_search(date).await? {
        return Ok(DayOutcome::Empty);
    }

    let table = extract_all_pages(source, max_pages).await?;
    let record = normalize(&table);
    if record.is_empty() {
        return Ok(DayOutcome::Empty);
    }

    let path = store.write(date, &record)?;
    Ok(DayOutcome::Scraped {
        path,
        rows: record.row_count(),
    })
}

/// Walk the configured range in ascending order.
///
/// A failure on one date is recorded as [`DayOutcome::Failed`] and the loop
/// moves on. Closing the session afterwards is the caller's job.
pub async fn run_days<S>(
    source: &mut S,
    config: &RunConfig,
    observer: &mut dyn RunObserver,
) -> RunSummary
where
    S: DataSource + ?Sized,
{
    let store = OutputStore::new(&config.data_dir);
    let mut summary = RunSummary::default();

    tracing::info!(
        "Scanning {} to {} into {}",
        config.range.start,
        config.range.end,
        store.dir().display()
    );

    for date in config.range {
        let outcome = match precheck(config, &store, &date) {
            Some(reason) => DayOutcome::Skipped(reason),
            None => {
                observer.day_started(&date);
                match process_day(source, &store, &date, config.max_pages).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::warn!("{date} failed: {e}");
                        DayOutcome::Failed(e.to_string())
                    }
                }
            }
        };

        summary.record(date, &outcome);
        observer.day_finished(&date, &outcome);
    }

    tracing::info!(
        "Run finished: {} scraped, {} empty, {} failed",
        summary.scraped,
        summary.empty,
        summary.failed.len()
    );
    observer.run_finished(&summary);
    summary
}
