//! KPI observations and their Met / Missed / Check Data classification.
//!
//! A KPI target is free text that may embed a comparison operator and a unit,
//! e.g. `"<2%"`, `">95"`, `"$1200"` or `"≥3 ideas"`. The operator is detected
//! by scanning the raw target once; the numeric value is what remains after
//! stripping operators, currency/percent signs and unit words.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;

use crate::{Error, Result};

// ─── Category ────────────────────────────────────────────────────────────────

/// The fixed set of KPI categories offered by the entry form.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::EnumIter,
  strum::IntoStaticStr,
)]
pub enum Category {
  Quality,
  Efficiency,
  Downtime,
  Cost,
  #[serde(rename = "Problem Solving")]
  #[strum(serialize = "Problem Solving")]
  ProblemSolving,
  #[serde(rename = "Safety/5S")]
  #[strum(serialize = "Safety/5S")]
  SafetyFiveS,
  #[serde(rename = "Employee Engagement")]
  #[strum(serialize = "Employee Engagement")]
  EmployeeEngagement,
}

impl Category {
  /// All categories in form order.
  pub fn all() -> Vec<Category> { Category::iter().collect() }

  pub fn label(self) -> &'static str { self.into() }

  /// Parse one of the exact form labels.
  pub fn parse(label: &str) -> Result<Self> {
    Category::from_str(label.trim())
      .map_err(|_| Error::UnknownCategory(label.to_owned()))
  }
}

// ─── Comparator ──────────────────────────────────────────────────────────────

/// How an actual value is compared against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
  /// Target contains `<` anywhere (including `<=`): strictly below.
  LessThan,
  /// Target contains `>` anywhere (including `>=`): strictly above.
  GreaterThan,
  /// Target contains `≥`: at or above.
  AtLeast,
  /// Target contains `≤`: at or below.
  AtMost,
  /// No operator: exact equality.
  Equals,
}

impl Comparator {
  /// Detect the comparator in a raw target string.
  ///
  /// When several operator characters appear, `<` wins over `>`, which wins
  /// over `≥`, which wins over `≤`.
  pub fn detect(target: &str) -> Self {
    let (mut lt, mut gt, mut ge, mut le) = (false, false, false, false);
    for c in target.chars() {
      match c {
        '<' => lt = true,
        '>' => gt = true,
        '≥' => ge = true,
        '≤' => le = true,
        _ => {}
      }
    }

    if lt {
      Self::LessThan
    } else if gt {
      Self::GreaterThan
    } else if ge {
      Self::AtLeast
    } else if le {
      Self::AtMost
    } else {
      Self::Equals
    }
  }

  /// Whether `actual` satisfies this comparator against `target`.
  #[allow(clippy::float_cmp)]
  pub fn holds(self, actual: f64, target: f64) -> bool {
    match self {
      Self::LessThan => actual < target,
      Self::GreaterThan => actual > target,
      Self::AtLeast => actual >= target,
      Self::AtMost => actual <= target,
      Self::Equals => actual == target,
    }
  }
}

// ─── Measure parsing ─────────────────────────────────────────────────────────

/// Unit words stripped from targets and actuals before parsing.
pub const UNIT_WORDS: &[&str] = &["Units", "units", "minutes", "hours", "ideas"];

/// Parse the numeric part of a target or actual string.
///
/// Strips comparison operators, `%`, `$` and [`UNIT_WORDS`], then parses what
/// is left as `f64`. Returns `None` for empty or non-numeric input.
pub fn parse_measure(raw: &str) -> Option<f64> {
  let mut cleaned: String = raw
    .chars()
    .filter(|c| !matches!(c, '%' | '$' | '<' | '>' | '=' | '≥' | '≤'))
    .collect();
  for unit in UNIT_WORDS {
    cleaned = cleaned.replace(unit, "");
  }

  let value: f64 = cleaned.trim().parse().ok()?;
  value.is_finite().then_some(value)
}

// ─── Status and assessment ───────────────────────────────────────────────────

/// The stored status of a KPI observation.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::EnumIter,
  strum::IntoStaticStr,
)]
pub enum KpiStatus {
  Met,
  Missed,
  #[serde(rename = "Check Data")]
  #[strum(serialize = "Check Data")]
  CheckData,
}

impl KpiStatus {
  pub fn label(self) -> &'static str { self.into() }

  pub fn parse(label: &str) -> Result<Self> {
    KpiStatus::from_str(label.trim())
      .map_err(|_| Error::UnknownStatus(label.to_owned()))
  }
}

/// Which side of a KPI observation could not be read as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureField {
  Target,
  Actual,
}

/// The typed outcome of comparing an actual against a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Assessment {
  Compared {
    comparator: Comparator,
    target:     f64,
    actual:     f64,
    met:        bool,
  },
  /// Target is checked first, so an unreadable target is reported even when
  /// the actual is unreadable too.
  Unparseable { field: MeasureField },
}

impl Assessment {
  pub fn status(&self) -> KpiStatus {
    match self {
      Self::Compared { met: true, .. } => KpiStatus::Met,
      Self::Compared { met: false, .. } => KpiStatus::Missed,
      Self::Unparseable { .. } => KpiStatus::CheckData,
    }
  }
}

/// Compare `actual` against `target`.
pub fn assess(target: &str, actual: &str) -> Assessment {
  let comparator = Comparator::detect(target);

  let Some(target_val) = parse_measure(target) else {
    return Assessment::Unparseable { field: MeasureField::Target };
  };
  let Some(actual_val) = parse_measure(actual) else {
    return Assessment::Unparseable { field: MeasureField::Actual };
  };

  Assessment::Compared {
    comparator,
    target: target_val,
    actual: actual_val,
    met: comparator.holds(actual_val, target_val),
  }
}

/// Shorthand for `assess(target, actual).status()`.
pub fn classify(target: &str, actual: &str) -> KpiStatus {
  assess(target, actual).status()
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A KPI observation as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiEntry {
  pub date:     NaiveDate,
  pub category: Category,
  pub kpi:      String,
  pub target:   String,
  pub actual:   String,
  #[serde(default)]
  pub notes:    String,
}

/// A persisted KPI observation. `status` is derived on insertion and never
/// edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
  pub date:     NaiveDate,
  pub category: Category,
  pub kpi:      String,
  pub target:   String,
  pub actual:   String,
  pub status:   KpiStatus,
  pub notes:    String,
}

impl KpiRecord {
  /// Build the record for a new entry, computing its status.
  pub fn evaluate(entry: KpiEntry) -> (Self, Assessment) {
    let assessment = assess(&entry.target, &entry.actual);
    let record = Self {
      date:     entry.date,
      category: entry.category,
      kpi:      entry.kpi,
      target:   entry.target,
      actual:   entry.actual,
      status:   assessment.status(),
      notes:    entry.notes,
    };
    (record, assessment)
  }
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
  pub year:  i32,
  pub month: u32,
}

impl Month {
  pub fn of(date: NaiveDate) -> Self {
    use chrono::Datelike as _;
    Self { year: date.year(), month: date.month() }
  }

  pub fn contains(self, date: NaiveDate) -> bool { Self::of(date) == self }
}

impl fmt::Display for Month {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

impl FromStr for Month {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidMonth(s.to_owned());
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
      return Err(invalid());
    }
    Ok(Self { year, month })
  }
}

impl TryFrom<String> for Month {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<Month> for String {
  fn from(m: Month) -> Self { m.to_string() }
}

/// Category and month filters for the KPI table. `None` means "All".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KpiFilter {
  pub category: Option<Category>,
  pub month:    Option<Month>,
}

impl KpiFilter {
  pub fn matches(&self, record: &KpiRecord) -> bool {
    self.category.is_none_or(|c| c == record.category)
      && self.month.is_none_or(|m| m.contains(record.date))
  }

  /// Records passing the filter, in their original order.
  pub fn apply<'a>(&self, records: &'a [KpiRecord]) -> Vec<&'a KpiRecord> {
    records.iter().filter(|r| self.matches(r)).collect()
  }
}

/// Distinct categories present in `records`, in first-seen order.
pub fn available_categories(records: &[KpiRecord]) -> Vec<Category> {
  let mut seen = Vec::new();
  for r in records {
    if !seen.contains(&r.category) {
      seen.push(r.category);
    }
  }
  seen
}

/// Distinct months present in `records`, in first-seen order.
pub fn available_months(records: &[KpiRecord]) -> Vec<Month> {
  let mut seen = Vec::new();
  for r in records {
    let m = Month::of(r.date);
    if !seen.contains(&m) {
      seen.push(m);
    }
  }
  seen
}

// ─── Status overview ─────────────────────────────────────────────────────────

/// One slice of the status overview chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusShare {
  pub status:  KpiStatus,
  pub count:   usize,
  /// Share of the total, rounded to one decimal place.
  pub percent: f64,
}

/// Count of each status over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
  pub met:        usize,
  pub missed:     usize,
  pub check_data: usize,
}

impl StatusSummary {
  pub fn tally<'a>(records: impl IntoIterator<Item = &'a KpiRecord>) -> Self {
    let mut summary = Self::default();
    for r in records {
      match r.status {
        KpiStatus::Met => summary.met += 1,
        KpiStatus::Missed => summary.missed += 1,
        KpiStatus::CheckData => summary.check_data += 1,
      }
    }
    summary
  }

  pub fn total(&self) -> usize { self.met + self.missed + self.check_data }

  pub fn count(&self, status: KpiStatus) -> usize {
    match status {
      KpiStatus::Met => self.met,
      KpiStatus::Missed => self.missed,
      KpiStatus::CheckData => self.check_data,
    }
  }

  /// Non-empty slices in Met, Missed, Check Data order. Empty when there are
  /// no records.
  pub fn shares(&self) -> Vec<StatusShare> {
    let total = self.total();
    if total == 0 {
      return Vec::new();
    }
    KpiStatus::iter()
      .map(|status| (status, self.count(status)))
      .filter(|(_, count)| *count > 0)
      .map(|(status, count)| StatusShare {
        status,
        count,
        percent: (count as f64 * 1000.0 / total as f64).round() / 10.0,
      })
      .collect()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn record(date: NaiveDate, category: Category, status: KpiStatus) -> KpiRecord {
    KpiRecord {
      date,
      category,
      kpi: "Scrap Rate".into(),
      target: "<2%".into(),
      actual: "1%".into(),
      status,
      notes: String::new(),
    }
  }

  #[test]
  fn less_than_target_is_strict() {
    assert_eq!(classify("<2%", "1.5%"), KpiStatus::Met);
    assert_eq!(classify("<2%", "2%"), KpiStatus::Missed);
    assert_eq!(classify("<=2", "2"), KpiStatus::Missed);
  }

  #[test]
  fn greater_than_target() {
    assert_eq!(classify(">95%", "96"), KpiStatus::Met);
    assert_eq!(classify(">95%", "95"), KpiStatus::Missed);
  }

  #[test]
  fn comparator_detected_anywhere_in_target() {
    assert_eq!(Comparator::detect("95 >"), Comparator::GreaterThan);
    assert_eq!(Comparator::detect("keep < 4 hours"), Comparator::LessThan);
    assert_eq!(Comparator::detect("<> 3"), Comparator::LessThan);
    assert_eq!(Comparator::detect("1200"), Comparator::Equals);
  }

  #[test]
  fn plain_target_needs_exact_equality() {
    assert_eq!(classify("$1200", "1200"), KpiStatus::Met);
    assert_eq!(classify("$1200", "$1199.99"), KpiStatus::Missed);
  }

  #[test]
  fn unit_words_are_stripped() {
    assert_eq!(classify("<30 minutes", "25 minutes"), KpiStatus::Met);
    assert_eq!(classify(">100 Units", "90 Units"), KpiStatus::Missed);
    assert_eq!(classify("<2 hours", "1.5"), KpiStatus::Met);
  }

  #[test]
  fn at_least_target_is_its_own_comparator() {
    let a = assess("≥3 ideas", "3");
    assert_eq!(a.status(), KpiStatus::Met);
    assert!(matches!(
      a,
      Assessment::Compared { comparator: Comparator::AtLeast, .. }
    ));
    assert_eq!(classify("≥3 ideas", "2 ideas"), KpiStatus::Missed);
    assert_eq!(classify("≤1", "1"), KpiStatus::Met);
  }

  #[test]
  fn non_numeric_values_need_checking() {
    assert_eq!(classify("<2%", "n/a"), KpiStatus::CheckData);
    assert_eq!(classify("<2%", ""), KpiStatus::CheckData);
    assert_eq!(classify("zero", "0"), KpiStatus::CheckData);
    assert_eq!(classify("", ""), KpiStatus::CheckData);
  }

  #[test]
  fn unparseable_reports_which_side() {
    assert_eq!(
      assess("tbd", "4"),
      Assessment::Unparseable { field: MeasureField::Target }
    );
    assert_eq!(
      assess("4", "tbd"),
      Assessment::Unparseable { field: MeasureField::Actual }
    );
  }

  #[test]
  fn parse_measure_rejects_infinities() {
    assert_eq!(parse_measure("inf"), None);
    assert_eq!(parse_measure(" 4.5 % "), Some(4.5));
    assert_eq!(parse_measure("$-3"), Some(-3.0));
  }

  #[test]
  fn evaluate_always_derives_status() {
    let entry = KpiEntry {
      date:     day(2024, 5, 2),
      category: Category::Quality,
      kpi:      "Customer Complaints".into(),
      target:   "<3".into(),
      actual:   "1".into(),
      notes:    "".into(),
    };
    let (record, _) = KpiRecord::evaluate(entry);
    assert_eq!(record.status, KpiStatus::Met);
  }

  #[test]
  fn category_labels_round_trip() {
    assert_eq!(Category::all().len(), 7);
    for c in Category::all() {
      assert_eq!(Category::parse(c.label()).unwrap(), c);
    }
    assert_eq!(Category::SafetyFiveS.to_string(), "Safety/5S");
    assert!(Category::parse("Morale").is_err());
  }

  #[test]
  fn status_serialises_with_space() {
    let json = serde_json::to_string(&KpiStatus::CheckData).unwrap();
    assert_eq!(json, "\"Check Data\"");
    assert_eq!(KpiStatus::parse("Check Data").unwrap(), KpiStatus::CheckData);
  }

  #[test]
  fn month_parsing() {
    let m: Month = "2024-03".parse().unwrap();
    assert_eq!(m, Month { year: 2024, month: 3 });
    assert_eq!(m.to_string(), "2024-03");
    assert!("2024-13".parse::<Month>().is_err());
    assert!("March".parse::<Month>().is_err());
  }

  #[test]
  fn filter_by_category_and_month() {
    let records = vec![
      record(day(2024, 3, 1), Category::Quality, KpiStatus::Met),
      record(day(2024, 3, 9), Category::Cost, KpiStatus::Missed),
      record(day(2024, 4, 2), Category::Quality, KpiStatus::CheckData),
    ];

    let all = KpiFilter::default().apply(&records);
    assert_eq!(all.len(), 3);

    let quality = KpiFilter { category: Some(Category::Quality), month: None };
    assert_eq!(quality.apply(&records).len(), 2);

    let march_quality = KpiFilter {
      category: Some(Category::Quality),
      month:    Some(Month { year: 2024, month: 3 }),
    };
    let hits = march_quality.apply(&records);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].date, day(2024, 3, 1));

    assert_eq!(
      available_categories(&records),
      vec![Category::Quality, Category::Cost]
    );
    assert_eq!(available_months(&records).len(), 2);
  }

  #[test]
  fn summary_shares_skip_empty_statuses() {
    let records = vec![
      record(day(2024, 3, 1), Category::Quality, KpiStatus::Met),
      record(day(2024, 3, 2), Category::Quality, KpiStatus::Met),
      record(day(2024, 3, 3), Category::Quality, KpiStatus::Missed),
    ];
    let summary = StatusSummary::tally(&records);
    assert_eq!(summary.total(), 3);

    let shares = summary.shares();
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].status, KpiStatus::Met);
    assert_eq!(shares[0].percent, 66.7);
    assert_eq!(shares[1].percent, 33.3);

    assert!(StatusSummary::default().shares().is_empty());
  }
}
