//! The `QualityStore` trait.
//!
//! Implemented by storage backends (`qdash-store-sqlite`, `qdash-store-csv`).
//! Higher layers (`qdash-api`, `qdash-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  ctq::{CtqMeasurements, CtqRecord},
  kpi::{KpiEntry, KpiRecord},
};

/// Append-only storage for the KPI and CTQ tables.
///
/// Records are never updated or deleted. Duplicate submissions for the same
/// date are kept. Loads return every record in insertion order; a store that
/// has never been written to loads as empty.
pub trait QualityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Derive the status of `entry` and append it to the KPI table.
  fn record_kpi(
    &self,
    entry: KpiEntry,
  ) -> impl Future<Output = Result<KpiRecord, Self::Error>> + Send + '_;

  /// Validate `measurements`, derive the health score and append the day to
  /// the CTQ table.
  fn record_ctq(
    &self,
    date: NaiveDate,
    measurements: CtqMeasurements,
  ) -> impl Future<Output = Result<CtqRecord, Self::Error>> + Send + '_;

  /// Every KPI record, oldest first.
  fn load_kpi(&self) -> impl Future<Output = Result<Vec<KpiRecord>, Self::Error>> + Send + '_;

  /// Every CTQ record, oldest first.
  fn load_ctq(&self) -> impl Future<Output = Result<Vec<CtqRecord>, Self::Error>> + Send + '_;
}
