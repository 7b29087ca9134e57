//! Human-readable progress lines on stdout.

use std::io::{self, Write};

use nepse_scrape::{DayOutcome, RunObserver, RunSummary, SkipReason, TradingDate};

/// One status line for a finished date.
pub fn outcome_line(date: &TradingDate, outcome: &DayOutcome) -> String {
    match outcome {
        DayOutcome::Skipped(SkipReason::Weekend) => format!("⏭  {date} skipped (market closed)"),
        DayOutcome::Skipped(SkipReason::AlreadyScraped) => {
            format!("⏭  {date} skipped (already scraped)")
        }
        DayOutcome::Scraped { path, rows } => {
            format!("✅ {date} saved {rows} rows to {}", path.display())
        }
        DayOutcome::Empty => format!("⚠  {date} no data"),
        DayOutcome::Failed(reason) => format!("❌ {date} error: {reason}"),
    }
}

/// Closing block printed after the last date.
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Done: {} saved, {} no data, {} closed, {} already scraped, {} failed",
        summary.scraped,
        summary.empty,
        summary.skipped_weekend,
        summary.skipped_existing,
        summary.failed.len()
    )];
    for (date, reason) in &summary.failed {
        lines.push(format!("  ❌ {date}: {reason}"));
    }
    lines
}

/// [`RunObserver`] that prints a line per date.
pub struct ConsoleObserver<W: Write + Send> {
    out: W,
}

impl ConsoleObserver<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        // stdout going away (closed pipe) must not abort the run
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> RunObserver for ConsoleObserver<W> {
    fn day_finished(&mut self, date: &TradingDate, outcome: &DayOutcome) {
        let line = outcome_line(date, outcome);
        self.emit(&line);
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        for line in summary_lines(summary) {
            self.emit(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn d(s: &str) -> TradingDate {
        TradingDate::parse(s).unwrap()
    }

    #[test]
    fn test_outcome_markers() {
        let date = d("2024-01-01");
        let saved = DayOutcome::Scraped {
            path: PathBuf::from("data/2024_01_01.csv"),
            rows: 12,
        };
        assert_eq!(
            outcome_line(&date, &saved),
            "✅ 2024-01-01 saved 12 rows to data/2024_01_01.csv"
        );
        assert!(outcome_line(&date, &DayOutcome::Empty).starts_with('⚠'));
        assert!(outcome_line(&date, &DayOutcome::Failed("x".into())).starts_with('❌'));
        assert!(outcome_line(&date, &DayOutcome::Skipped(SkipReason::AlreadyScraped))
            .starts_with('⏭'));
    }

    #[test]
    fn test_observer_writes_one_line_per_day() {
        let mut console = ConsoleObserver::new(Vec::new());
        console.day_finished(&d("2024-01-05"), &DayOutcome::Skipped(SkipReason::Weekend));
        console.day_finished(&d("2024-01-04"), &DayOutcome::Empty);
        let text = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(
            text,
            "⏭  2024-01-05 skipped (market closed)\n⚠  2024-01-04 no data\n"
        );
    }

    #[test]
    fn test_summary_lists_failures() {
        let mut summary = RunSummary::default();
        summary.record(d("2024-01-02"), &DayOutcome::Failed("timeout".into()));
        let lines = summary_lines(&summary);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1 failed"));
        assert_eq!(lines[1], "  ❌ 2024-01-02: timeout");
    }
}
