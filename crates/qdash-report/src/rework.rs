//! Rework log ingest.
//!
//! The log is a CSV file with at least a `Discard reason` and a `Rework Date`
//! column, in any position; other columns are ignored. Header names are
//! matched after trimming surrounding whitespace.

use std::io;

use qdash_core::rework::{parse_rework_date, ReworkEntry};

use crate::{Error, Result};

pub const REASON_COLUMN: &str = "Discard reason";
pub const DATE_COLUMN: &str = "Rework Date";

fn column(headers: &csv::StringRecord, name: &'static str) -> Result<usize> {
  headers
    .iter()
    .position(|h| h == name)
    .ok_or(Error::MissingColumn(name))
}

/// Read every line of a rework log.
///
/// Blank reasons become `Unknown`; unreadable dates become `None`. Neither is
/// an error.
pub fn read_rework_csv<R: io::Read>(input: R) -> Result<Vec<ReworkEntry>> {
  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .trim(csv::Trim::Headers)
    .from_reader(input);

  let headers = reader.headers()?.clone();
  let reason_idx = column(&headers, REASON_COLUMN)?;
  let date_idx = column(&headers, DATE_COLUMN)?;

  let mut entries = Vec::new();
  for record in reader.records() {
    let record = record?;
    let reason = record.get(reason_idx).unwrap_or("");
    let date = record.get(date_idx).and_then(parse_rework_date);
    entries.push(ReworkEntry::new(reason, date));
  }
  Ok(entries)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn reads_columns_by_name() {
    let log = "Part, Rework Date ,Operator,Discard reason \n\
P-1,2024-03-01,ann,Scratch\n\
P-2,03/02/2024,bo,\n\
P-3,not a date,cy,Dent\n";
    let entries = read_rework_csv(log.as_bytes()).unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].reason, "Scratch");
    assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert_eq!(entries[1].reason, "Unknown");
    assert_eq!(entries[1].date, NaiveDate::from_ymd_opt(2024, 3, 2));
    assert_eq!(entries[2].date, None);
  }

  #[test]
  fn short_rows_are_tolerated() {
    let log = "Discard reason,Rework Date\nScratch\n";
    let entries = read_rework_csv(log.as_bytes()).unwrap();
    assert_eq!(entries, vec![ReworkEntry::new("Scratch", None)]);
  }

  #[test]
  fn missing_column_is_an_error() {
    let err = read_rework_csv(&b"Reason,Date\nScratch,2024-03-01\n"[..]).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(REASON_COLUMN)));

    let err = read_rework_csv(&b"Discard reason\nScratch\n"[..]).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(DATE_COLUMN)));
  }
}
