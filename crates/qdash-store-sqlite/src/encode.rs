//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD`. Categories, statuses and recommendations
//! are stored as their form labels so the tables read the same as the CSV
//! files.

use chrono::NaiveDate;
use qdash_core::{
  ctq::{CtqMeasurements, CtqRecord, Recommendation},
  kpi::{Category, KpiRecord, KpiStatus},
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_count(column: &str, v: i64) -> Result<u32> {
  u32::try_from(v).map_err(|_| Error::Corrupt(format!("{column} = {v}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `kpi_records` row.
pub struct RawKpi {
  pub date:     String,
  pub category: String,
  pub kpi:      String,
  pub target:   String,
  pub actual:   String,
  pub status:   String,
  pub notes:    String,
}

impl RawKpi {
  pub fn into_record(self) -> Result<KpiRecord> {
    Ok(KpiRecord {
      date:     decode_date(&self.date)?,
      category: Category::parse(&self.category)?,
      kpi:      self.kpi,
      target:   self.target,
      actual:   self.actual,
      status:   KpiStatus::parse(&self.status)?,
      notes:    self.notes,
    })
  }
}

/// Raw values read directly from a `ctq_records` row.
pub struct RawCtq {
  pub date:               String,
  pub defect_rate:        f64,
  pub first_pass_yield:   f64,
  pub downtime_events:    i64,
  pub scrap_units:        i64,
  pub calibration_misses: i64,
  pub health_score:       i64,
  pub recommendation:     String,
}

impl RawCtq {
  pub fn into_record(self) -> Result<CtqRecord> {
    let health_score = u8::try_from(self.health_score)
      .map_err(|_| Error::Corrupt(format!("health_score = {}", self.health_score)))?;

    Ok(CtqRecord {
      date: decode_date(&self.date)?,
      measurements: CtqMeasurements {
        defect_rate:        self.defect_rate,
        first_pass_yield:   self.first_pass_yield,
        downtime_events:    decode_count("downtime_events", self.downtime_events)?,
        scrap_units:        decode_count("scrap_units", self.scrap_units)?,
        calibration_misses: decode_count("calibration_misses", self.calibration_misses)?,
      },
      health_score,
      recommendation: Recommendation::parse(&self.recommendation)?,
    })
  }
}
