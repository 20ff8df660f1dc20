//! Rework log entries and the date range used to select them.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Reason recorded when the log leaves the discard reason blank.
pub const UNKNOWN_REASON: &str = "Unknown";

/// One line of an uploaded rework log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReworkEntry {
  pub reason: String,
  /// `None` when the log's date could not be read.
  pub date:   Option<NaiveDate>,
}

impl ReworkEntry {
  /// Build an entry, normalising a blank reason to [`UNKNOWN_REASON`].
  pub fn new(reason: &str, date: Option<NaiveDate>) -> Self {
    let reason = reason.trim();
    let reason = if reason.is_empty() { UNKNOWN_REASON } else { reason };
    Self { reason: reason.to_owned(), date }
  }
}

// Order matters: chrono's `%Y` happily reads "3" or "24" as a year, so the
// two-digit-year and month-first slash forms are tried before `%Y/%m/%d`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%d %H:%M",
  "%m/%d/%Y %H:%M:%S",
  "%m/%d/%Y %H:%M",
];

/// Read a rework date leniently. Anything unrecognised yields `None`.
pub fn parse_rework_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  DATE_FORMATS
    .iter()
    .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
    .or_else(|| {
      DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .map(|dt| dt.date())
    })
    .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

// ─── Date range ──────────────────────────────────────────────────────────────

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl DateRange {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    if start > end {
      return Err(Error::InvertedRange { start, end });
    }
    Ok(Self { start, end })
  }

  /// The smallest range covering every dated entry, or `None` if no entry
  /// has a readable date.
  pub fn spanning(entries: &[ReworkEntry]) -> Option<Self> {
    let mut dates = entries.iter().filter_map(|e| e.date);
    let first = dates.next()?;
    let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(Self { start, end })
  }

  /// Resolve optional bounds against the entries' own span.
  ///
  /// A missing bound defaults to the span's end on that side, clamped so it
  /// never crosses the bound that was given. Only two explicit bounds can
  /// form an inverted range.
  pub fn resolve(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    entries: &[ReworkEntry],
  ) -> Result<Option<Self>> {
    let span = Self::spanning(entries);
    let (start, end) = match (start, end) {
      (Some(start), Some(end)) => (start, end),
      (Some(start), None) => (start, span.map_or(start, |s| s.end.max(start))),
      (None, Some(end)) => (span.map_or(end, |s| s.start.min(end)), end),
      (None, None) => return Ok(span),
    };
    Self::new(start, end).map(Some)
  }

  /// Undated entries are never contained.
  pub fn contains(&self, date: Option<NaiveDate>) -> bool {
    date.is_some_and(|d| self.start <= d && d <= self.end)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn blank_reason_becomes_unknown() {
    assert_eq!(ReworkEntry::new("  ", None).reason, UNKNOWN_REASON);
    assert_eq!(ReworkEntry::new(" Scratch ", None).reason, "Scratch");
  }

  #[test]
  fn dates_are_parsed_leniently() {
    let expected = Some(day(2024, 3, 7));
    assert_eq!(parse_rework_date("2024-03-07"), expected);
    assert_eq!(parse_rework_date("2024/03/07"), expected);
    assert_eq!(parse_rework_date("03/07/2024"), expected);
    assert_eq!(parse_rework_date("3/7/24"), expected);
    assert_eq!(parse_rework_date("07.03.2024"), expected);
    assert_eq!(parse_rework_date("2024-03-07 14:05:00"), expected);
    assert_eq!(parse_rework_date("2024-03-07T14:05:00+02:00"), expected);
  }

  #[test]
  fn garbage_dates_are_none() {
    assert_eq!(parse_rework_date(""), None);
    assert_eq!(parse_rework_date("yesterday"), None);
    assert_eq!(parse_rework_date("2024-02-30"), None);
  }

  #[test]
  fn spanning_ignores_undated_entries() {
    let entries = vec![
      ReworkEntry::new("A", Some(day(2024, 3, 9))),
      ReworkEntry::new("B", None),
      ReworkEntry::new("C", Some(day(2024, 3, 1))),
    ];
    let span = DateRange::spanning(&entries).unwrap();
    assert_eq!(span.start, day(2024, 3, 1));
    assert_eq!(span.end, day(2024, 3, 9));
    assert!(!span.contains(None));

    assert!(DateRange::spanning(&[ReworkEntry::new("B", None)]).is_none());
  }

  #[test]
  fn resolve_fills_missing_bounds() {
    let entries = vec![
      ReworkEntry::new("A", Some(day(2024, 3, 1))),
      ReworkEntry::new("B", Some(day(2024, 3, 20))),
    ];
    let r = DateRange::resolve(Some(day(2024, 3, 10)), None, &entries)
      .unwrap()
      .unwrap();
    assert_eq!(r, DateRange { start: day(2024, 3, 10), end: day(2024, 3, 20) });

    assert!(DateRange::resolve(None, None, &[]).unwrap().is_none());
    assert!(DateRange::resolve(Some(day(2024, 4, 1)), Some(day(2024, 3, 1)), &entries).is_err());
  }

  #[test]
  fn one_sided_bound_past_the_log_is_empty_not_inverted() {
    let entries = vec![
      ReworkEntry::new("A", Some(day(2024, 3, 1))),
      ReworkEntry::new("B", Some(day(2024, 3, 9))),
    ];

    let late = DateRange::resolve(Some(day(2025, 1, 1)), None, &entries)
      .unwrap()
      .unwrap();
    assert_eq!(late, DateRange { start: day(2025, 1, 1), end: day(2025, 1, 1) });
    assert!(!entries.iter().any(|e| late.contains(e.date)));

    let early = DateRange::resolve(None, Some(day(2024, 1, 1)), &entries)
      .unwrap()
      .unwrap();
    assert_eq!(early, DateRange { start: day(2024, 1, 1), end: day(2024, 1, 1) });

    let no_dates = DateRange::resolve(Some(day(2024, 5, 1)), None, &[]).unwrap();
    assert_eq!(no_dates, Some(DateRange { start: day(2024, 5, 1), end: day(2024, 5, 1) }));
  }
}
