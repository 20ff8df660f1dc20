//! Tests for `CsvStore` against files in a temporary directory.

use chrono::NaiveDate;
use qdash_core::{
  ctq::{CtqMeasurements, Recommendation},
  kpi::{Category, KpiEntry, KpiStatus},
  store::QualityStore,
};
use tempfile::TempDir;

use crate::{CsvStore, Error};

fn store() -> (TempDir, CsvStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = CsvStore::new(
    dir.path().join("kpi_records.csv"),
    dir.path().join("daily_ctq_records.csv"),
  );
  (dir, store)
}

fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 7, d).unwrap() }

fn kpi(d: u32, name: &str) -> KpiEntry {
  KpiEntry {
    date:     day(d),
    category: Category::Downtime,
    kpi:      name.into(),
    target:   "<30 minutes".into(),
    actual:   "45 minutes".into(),
    notes:    "press 4, hydraulic leak".into(),
  }
}

#[tokio::test]
async fn missing_files_load_as_empty_tables() {
  let (_dir, s) = store();
  assert!(s.load_kpi().await.unwrap().is_empty());
  assert!(s.load_ctq().await.unwrap().is_empty());
  assert!(!s.kpi_path().exists());
}

#[tokio::test]
async fn first_append_writes_header_once() {
  let (_dir, s) = store();
  let first = s.record_kpi(kpi(1, "Unplanned Downtime")).await.unwrap();
  assert_eq!(first.status, KpiStatus::Missed);
  s.record_kpi(kpi(2, "Unplanned Downtime")).await.unwrap();

  let text = std::fs::read_to_string(s.kpi_path()).unwrap();
  let lines: Vec<_> = text.lines().collect();
  assert_eq!(lines.len(), 3);
  assert_eq!(lines[0], "Date,Category,KPI,Target,Actual,Status,Notes/Actions");
  assert!(lines[1].starts_with("2024-07-01,Downtime,Unplanned Downtime"));
}

#[tokio::test]
async fn records_reload_in_insertion_order() {
  let (_dir, s) = store();

  for (d, name) in [(5, "c"), (1, "a"), (3, "b")] {
    s.record_kpi(kpi(d, name)).await.unwrap();
  }
  for rate in [0.2, 4.0] {
    let m = CtqMeasurements { defect_rate: rate, ..CtqMeasurements::default() };
    s.record_ctq(day(1), m).await.unwrap();
  }

  // A fresh handle on the same files sees everything.
  let reopened = CsvStore::new(s.kpi_path(), s.ctq_path());
  let kpis = reopened.load_kpi().await.unwrap();
  let names: Vec<_> = kpis.iter().map(|r| r.kpi.as_str()).collect();
  assert_eq!(names, ["c", "a", "b"]);
  assert_eq!(kpis[0].notes, "press 4, hydraulic leak");

  let ctqs = reopened.load_ctq().await.unwrap();
  assert_eq!(ctqs.len(), 2);
  assert_eq!(ctqs[0].recommendation, Recommendation::Excellent);
  assert_eq!(ctqs[1].health_score, 4);
  assert_eq!(ctqs[1].recommendation, Recommendation::Caution);
}

#[tokio::test]
async fn reload_returns_exactly_what_was_recorded() {
  let (_dir, s) = store();
  let entry = KpiEntry {
    kpi: " Scrap Rate ".into(),
    target: " <2 ".into(),
    actual: " 1".into(),
    ..kpi(4, "unused")
  };
  let written = s.record_kpi(entry).await.unwrap();
  assert_eq!(written.status, KpiStatus::Met);

  let loaded = s.load_kpi().await.unwrap();
  assert_eq!(loaded, vec![written]);
}

#[tokio::test]
async fn concurrent_appends_are_all_kept() {
  let (_dir, s) = store();
  let mut handles = Vec::new();
  for i in 0..20 {
    let s = s.clone();
    handles.push(tokio::spawn(async move {
      s.record_kpi(kpi(1, &format!("kpi-{i}"))).await.unwrap();
    }));
  }
  for h in handles {
    h.await.unwrap();
  }
  assert_eq!(s.load_kpi().await.unwrap().len(), 20);
}

#[tokio::test]
async fn invalid_ctq_leaves_file_untouched() {
  let (_dir, s) = store();
  let m = CtqMeasurements { first_pass_yield: -1.0, ..CtqMeasurements::default() };
  let err = s.record_ctq(day(1), m).await.unwrap_err();
  assert!(matches!(err, Error::Core(_)));
  assert!(!s.ctq_path().exists());
}

#[tokio::test]
async fn corrupt_table_is_reported() {
  let (_dir, s) = store();
  std::fs::write(s.kpi_path(), "Something,Else\n1,2\n").unwrap();
  let err = s.load_kpi().await.unwrap_err();
  assert!(matches!(err, Error::Table { .. }));
}
