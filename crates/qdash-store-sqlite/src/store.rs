//! [`SqliteStore`], the SQLite implementation of [`QualityStore`].

use std::path::Path;

use chrono::NaiveDate;
use qdash_core::{
  ctq::{CtqMeasurements, CtqRecord},
  kpi::{KpiEntry, KpiRecord},
  store::QualityStore,
};

use crate::{
  encode::{encode_date, RawCtq, RawKpi},
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// KPI and CTQ tables backed by a single SQLite file.
///
/// Each record is one `INSERT`, so concurrent sessions never lose each
/// other's appends. Clones share the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── QualityStore impl ───────────────────────────────────────────────────────

impl QualityStore for SqliteStore {
  type Error = crate::Error;

  async fn record_kpi(&self, entry: KpiEntry) -> Result<KpiRecord> {
    let (record, _) = KpiRecord::evaluate(entry);

    let date_str     = encode_date(record.date);
    let category_str = record.category.label();
    let status_str   = record.status.label();
    let kpi          = record.kpi.clone();
    let target       = record.target.clone();
    let actual       = record.actual.clone();
    let notes        = record.notes.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO kpi_records (date, category, kpi, target, actual, status, notes)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![date_str, category_str, kpi, target, actual, status_str, notes],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(kpi = %record.kpi, status = %record.status, "kpi record appended");
    Ok(record)
  }

  async fn record_ctq(
    &self,
    date:         NaiveDate,
    measurements: CtqMeasurements,
  ) -> Result<CtqRecord> {
    let record = CtqRecord::evaluate(date, measurements)?;

    let date_str = encode_date(record.date);
    let m        = record.measurements;
    let score    = i64::from(record.health_score);
    let rec_str  = record.recommendation.label();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ctq_records (
             date, defect_rate, first_pass_yield, downtime_events,
             scrap_units, calibration_misses, health_score, recommendation
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            date_str,
            m.defect_rate,
            m.first_pass_yield,
            m.downtime_events,
            m.scrap_units,
            m.calibration_misses,
            score,
            rec_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(date = %record.date, score = record.health_score, "ctq record appended");
    Ok(record)
  }

  async fn load_kpi(&self) -> Result<Vec<KpiRecord>> {
    let raws: Vec<RawKpi> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT date, category, kpi, target, actual, status, notes
           FROM kpi_records ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawKpi {
              date:     row.get(0)?,
              category: row.get(1)?,
              kpi:      row.get(2)?,
              target:   row.get(3)?,
              actual:   row.get(4)?,
              status:   row.get(5)?,
              notes:    row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawKpi::into_record).collect()
  }

  async fn load_ctq(&self) -> Result<Vec<CtqRecord>> {
    let raws: Vec<RawCtq> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT date, defect_rate, first_pass_yield, downtime_events,
                  scrap_units, calibration_misses, health_score, recommendation
           FROM ctq_records ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCtq {
              date:               row.get(0)?,
              defect_rate:        row.get(1)?,
              first_pass_yield:   row.get(2)?,
              downtime_events:    row.get(3)?,
              scrap_units:        row.get(4)?,
              calibration_misses: row.get(5)?,
              health_score:       row.get(6)?,
              recommendation:     row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCtq::into_record).collect()
  }
}
