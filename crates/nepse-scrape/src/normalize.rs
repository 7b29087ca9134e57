//! Record normalization: dedupe rows, promote the header, drop the serial column.

use std::collections::HashSet;

use crate::types::{DayTable, NormalizedRecord};

/// Header of the serial-number column the site prepends to every table.
pub const SEQUENCE_COLUMN: &str = "S.No";

/// Turn a raw day table into a flat record.
///
/// Rows are first padded to a common width so that the result is
/// rectangular. Exact duplicates are then removed (first occurrence wins),
/// which also drops the header row repeated on every page. The first
/// surviving row becomes the column names and any `S.No` column is removed.
pub fn normalize(table: &DayTable) -> NormalizedRecord {
    if table.is_empty() {
        return NormalizedRecord::default();
    }

    let width = table.rows.iter().map(Vec::len).max().unwrap_or(0);

    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(table.len());
    let mut unique = Vec::with_capacity(table.len());
    for row in &table.rows {
        let mut padded = row.clone();
        padded.resize(width, String::new());
        if seen.insert(padded.clone()) {
            unique.push(padded);
        }
    }

    let mut rows = unique.into_iter();
    let header = match rows.next() {
        Some(h) => h,
        None => return NormalizedRecord::default(),
    };

    let keep: Vec<usize> = header
        .iter()
        .enumerate()
        .filter(|(_, name)| name.as_str() != SEQUENCE_COLUMN)
        .map(|(i, _)| i)
        .collect();

    let project = |row: &[String]| -> Vec<String> { keep.iter().map(|&i| row[i].clone()).collect() };

    NormalizedRecord {
        columns: project(&header),
        rows: rows.map(|r| project(&r)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> DayTable {
        DayTable::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_dedupe_promote_and_drop_serial() {
        let t = table(&[
            &["S.No", "Symbol", "LTP"],
            &["1", "A", "100"],
            &["1", "A", "100"],
            &["2", "B", "200"],
        ]);
        let rec = normalize(&t);
        assert_eq!(rec.columns, vec!["Symbol", "LTP"]);
        assert_eq!(rec.rows, vec![vec!["A", "100"], vec!["B", "200"]]);
    }

    #[test]
    fn test_empty_table() {
        let rec = normalize(&DayTable::new());
        assert!(rec.is_empty());
        assert!(rec.columns.is_empty());
    }

    #[test]
    fn test_repeated_page_headers_collapse() {
        let t = table(&[
            &["S.No", "Symbol"],
            &["1", "A"],
            &["S.No", "Symbol"],
            &["2", "B"],
        ]);
        let rec = normalize(&t);
        assert_eq!(rec.columns, vec!["Symbol"]);
        assert_eq!(rec.rows, vec![vec!["A"], vec!["B"]]);
    }

    #[test]
    fn test_without_serial_column() {
        let t = table(&[&["Symbol", "LTP"], &["A", "1"]]);
        let rec = normalize(&t);
        assert_eq!(rec.columns, vec!["Symbol", "LTP"]);
        assert_eq!(rec.row_count(), 1);
    }

    #[test]
    fn test_serial_column_match_is_exact() {
        let t = table(&[&["S.No.", "s.no", "Symbol"], &["1", "1", "A"]]);
        let rec = normalize(&t);
        assert_eq!(rec.columns, vec!["S.No.", "s.no", "Symbol"]);
    }

    #[test]
    fn test_ragged_rows_padded() {
        let t = table(&[&["Symbol", "LTP", "Vol"], &["A", "1"], &["A", "1", ""]]);
        let rec = normalize(&t);
        assert_eq!(rec.rows, vec![vec!["A", "1", ""]]);
        // Missing trailing cells compare equal to empty ones, so the result is stable.
        assert_eq!(normalize(&rec.to_table()), rec);
    }

    #[test]
    fn test_header_only_is_empty() {
        let rec = normalize(&table(&[&["S.No", "Symbol"]]));
        assert!(rec.is_empty());
        assert_eq!(rec.columns, vec!["Symbol"]);
    }

    #[test]
    fn test_idempotent() {
        let t = table(&[
            &["S.No", "Symbol", "LTP"],
            &["1", "A", "100"],
            &["2", "B", "200"],
            &["2", "B", "200"],
        ]);
        let once = normalize(&t);
        let twice = normalize(&once.to_table());
        assert_eq!(once, twice);
    }
}
