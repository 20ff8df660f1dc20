//! Pareto analysis of rework reasons.
//!
//! Entries inside the date range are grouped by reason and ranked by count.
//! Each row carries its share of the total as a percentage (2 dp) and as
//! parts-per-million (0 dp).
//!
//! | View | Columns |
//! |------|---------|
//! | internal | Discard reason, Count, Percentage, PPM |
//! | customer | Discard reason, Percentage, PPM |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::rework::{DateRange, ReworkEntry};

pub const INTERNAL_COLUMNS: &[&str] = &["Discard reason", "Count", "Percentage", "PPM"];
pub const CUSTOMER_COLUMNS: &[&str] = &["Discard reason", "Percentage", "PPM"];

fn round_to(value: f64, places: i32) -> f64 {
  let scale = 10f64.powi(places);
  (value * scale).round() / scale
}

// ─── Options ─────────────────────────────────────────────────────────────────

/// Which audience the table is prepared for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParetoView {
  /// Keeps raw counts.
  #[default]
  Internal,
  /// Shares only; raw counts are withheld.
  Customer,
}

impl ParetoView {
  pub fn columns(self) -> &'static [&'static str] {
    match self {
      Self::Internal => INTERNAL_COLUMNS,
      Self::Customer => CUSTOMER_COLUMNS,
    }
  }
}

/// The value plotted on the Pareto chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMetric {
  #[default]
  Percentage,
  Ppm,
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoRow {
  pub reason:     String,
  pub count:      usize,
  pub percentage: f64,
  pub ppm:        f64,
}

impl ParetoRow {
  /// One-line text rendering, e.g. `Scratch : 2 (50.00%)` or, for the
  /// customer view, `Scratch : 50.00%`.
  pub fn summary_line(&self, view: ParetoView) -> String {
    match view {
      ParetoView::Internal => {
        format!("{} : {} ({:.2}%)", self.reason, self.count, self.percentage)
      }
      ParetoView::Customer => format!("{} : {:.2}%", self.reason, self.percentage),
    }
  }
}

/// A row shaped for a given [`ParetoView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
  pub reason:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub count:      Option<usize>,
  pub percentage: f64,
  pub ppm:        f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
  pub reason: String,
  pub value:  f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoReport {
  /// `None` when no entry had a readable date.
  pub range:            Option<DateRange>,
  /// Entries counted into the rows.
  pub total:            usize,
  /// Entries skipped because their date could not be read.
  pub excluded_undated: usize,
  /// Dated entries falling outside `range`.
  pub out_of_range:     usize,
  /// Ranked by descending count; ties keep first-occurrence order.
  pub rows:             Vec<ParetoRow>,
}

impl ParetoReport {
  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub fn display_rows(&self, view: ParetoView) -> Vec<DisplayRow> {
    self
      .rows
      .iter()
      .map(|r| DisplayRow {
        reason:     r.reason.clone(),
        count:      (view == ParetoView::Internal).then_some(r.count),
        percentage: r.percentage,
        ppm:        r.ppm,
      })
      .collect()
  }

  pub fn chart(&self, metric: ChartMetric) -> Vec<ChartPoint> {
    self
      .rows
      .iter()
      .map(|r| ChartPoint {
        reason: r.reason.clone(),
        value:  match metric {
          ChartMetric::Percentage => r.percentage,
          ChartMetric::Ppm => r.ppm,
        },
      })
      .collect()
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Group the entries inside `range` by reason and rank them.
///
/// Undated entries never fall inside a range. With `range == None` or an
/// empty selection the report has no rows and a zero total.
pub fn aggregate(entries: &[ReworkEntry], range: Option<DateRange>) -> ParetoReport {
  let excluded_undated = entries.iter().filter(|e| e.date.is_none()).count();

  let mut groups: Vec<(&str, usize)> = Vec::new();
  let mut index: HashMap<&str, usize> = HashMap::new();
  let mut out_of_range = 0;

  for entry in entries.iter().filter(|e| e.date.is_some()) {
    if !range.is_some_and(|r| r.contains(entry.date)) {
      out_of_range += 1;
      continue;
    }
    let slot = *index.entry(entry.reason.as_str()).or_insert_with(|| {
      groups.push((entry.reason.as_str(), 0));
      groups.len() - 1
    });
    groups[slot].1 += 1;
  }

  // Stable sort: equal counts stay in first-occurrence order.
  groups.sort_by(|a, b| b.1.cmp(&a.1));

  let total: usize = groups.iter().map(|(_, n)| n).sum();
  let rows = if total == 0 {
    Vec::new()
  } else {
    groups
      .into_iter()
      .map(|(reason, count)| {
        let share = count as f64 / total as f64;
        ParetoRow {
          reason: reason.to_owned(),
          count,
          percentage: round_to(share * 100.0, 2),
          ppm: round_to(share * 1_000_000.0, 0),
        }
      })
      .collect()
  };

  ParetoReport { range, total, excluded_undated, out_of_range, rows }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 3, d).unwrap() }

  fn entries(reasons: &[(&str, Option<u32>)]) -> Vec<ReworkEntry> {
    reasons
      .iter()
      .map(|(r, d)| ReworkEntry::new(r, d.map(day)))
      .collect()
  }

  fn march() -> Option<DateRange> { Some(DateRange::new(day(1), day(31)).unwrap()) }

  #[test]
  fn counts_and_shares() {
    let log = entries(&[
      ("Scratch", Some(1)),
      ("Scratch", Some(2)),
      ("Dent", Some(3)),
      ("", Some(4)),
    ]);
    let report = aggregate(&log, march());

    assert_eq!(report.total, 4);
    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.rows[0].reason, "Scratch");
    assert_eq!(report.rows[0].count, 2);
    assert_eq!(report.rows[0].percentage, 50.0);
    assert_eq!(report.rows[0].ppm, 500_000.0);
    assert_eq!(report.rows[1].reason, "Dent");
    assert_eq!(report.rows[1].percentage, 25.0);
    assert_eq!(report.rows[2].reason, "Unknown");
    assert_eq!(report.rows[2].percentage, 25.0);
  }

  #[test]
  fn ties_keep_first_occurrence_order() {
    let log = entries(&[
      ("Burr", Some(1)),
      ("Crack", Some(1)),
      ("Crack", Some(2)),
      ("Burr", Some(2)),
      ("Warp", Some(3)),
    ]);
    let report = aggregate(&log, march());
    let reasons: Vec<_> = report.rows.iter().map(|r| r.reason.as_str()).collect();
    assert_eq!(reasons, ["Burr", "Crack", "Warp"]);
  }

  #[test]
  fn shares_sum_to_whole_within_rounding() {
    let log = entries(&[
      ("A", Some(1)),
      ("B", Some(1)),
      ("C", Some(1)),
      ("C", Some(2)),
      ("D", Some(2)),
      ("D", Some(3)),
      ("D", Some(4)),
    ]);
    let report = aggregate(&log, march());
    let pct: f64 = report.rows.iter().map(|r| r.percentage).sum();
    let ppm: f64 = report.rows.iter().map(|r| r.ppm).sum();
    assert!((pct - 100.0).abs() <= 0.01 * report.rows.len() as f64, "pct sum {pct}");
    assert!((ppm - 1_000_000.0).abs() <= report.rows.len() as f64, "ppm sum {ppm}");
  }

  #[test]
  fn range_filters_inclusively() {
    let log = entries(&[("A", Some(1)), ("B", Some(5)), ("C", Some(10))]);
    let range = DateRange::new(day(5), day(10)).unwrap();
    let report = aggregate(&log, Some(range));
    assert_eq!(report.total, 2);
    assert_eq!(report.out_of_range, 1);
  }

  #[test]
  fn empty_selection_yields_no_rows() {
    let log = entries(&[("A", Some(1)), ("B", Some(2))]);
    let range = DateRange::new(day(20), day(25)).unwrap();
    let report = aggregate(&log, Some(range));
    assert!(report.is_empty());
    assert_eq!(report.total, 0);

    let none = aggregate(&[], None);
    assert!(none.is_empty());
  }

  #[test]
  fn undated_entries_are_always_excluded() {
    let log = entries(&[("A", None), ("B", Some(2)), ("A", None)]);
    let report = aggregate(&log, DateRange::spanning(&log));
    assert_eq!(report.total, 1);
    assert_eq!(report.excluded_undated, 2);
    assert_eq!(report.rows[0].reason, "B");

    let undated_only = entries(&[("A", None)]);
    let report = aggregate(&undated_only, DateRange::spanning(&undated_only));
    assert!(report.is_empty());
    assert_eq!(report.excluded_undated, 1);
  }

  #[test]
  fn views_and_chart_metrics() {
    let log = entries(&[("A", Some(1)), ("B", Some(1)), ("A", Some(2))]);
    let report = aggregate(&log, march());

    let customer = report.display_rows(ParetoView::Customer);
    assert!(customer.iter().all(|r| r.count.is_none()));
    let internal = report.display_rows(ParetoView::Internal);
    assert_eq!(internal[0].count, Some(2));

    let json = serde_json::to_value(&customer[0]).unwrap();
    assert!(json.get("count").is_none());

    let ppm = report.chart(ChartMetric::Ppm);
    assert_eq!(ppm[0].value, 666_667.0);
    let pct = report.chart(ChartMetric::Percentage);
    assert_eq!(pct[1].value, 33.33);

    assert_eq!(ParetoView::Customer.columns(), CUSTOMER_COLUMNS);
  }

  #[test]
  fn summary_lines() {
    let row = ParetoRow {
      reason:     "Scratch".into(),
      count:      2,
      percentage: 50.0,
      ppm:        500_000.0,
    };
    assert_eq!(row.summary_line(ParetoView::Internal), "Scratch : 2 (50.00%)");
    assert_eq!(row.summary_line(ParetoView::Customer), "Scratch : 50.00%");
  }
}
