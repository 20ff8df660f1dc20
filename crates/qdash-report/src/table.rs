//! CSV layout of the KPI and CTQ tables.
//!
//! One header row with the column names below, then one row per record in
//! insertion order. Dates are `YYYY-MM-DD`; categories, statuses and
//! recommendations are written as their form labels.

use std::io;

use chrono::NaiveDate;
use qdash_core::{
  ctq::{CtqMeasurements, CtqRecord, Recommendation},
  kpi::{Category, KpiRecord, KpiStatus},
};

use crate::{Error, Result};

pub const KPI_HEADERS: &[&str] =
  &["Date", "Category", "KPI", "Target", "Actual", "Status", "Notes/Actions"];

pub const CTQ_HEADERS: &[&str] = &[
  "Date",
  "Daily Defect Rate (%)",
  "First Pass Yield (%)",
  "Downtime Events (#)",
  "Scrap Units (#)",
  "Calibration Misses (#)",
  "Daily CTQ Health Score",
  "Recommendation",
];

// ─── Row codec ───────────────────────────────────────────────────────────────

/// A record type with a fixed CSV column layout.
pub trait TableRow: Sized {
  const HEADERS: &'static [&'static str];

  fn to_fields(&self) -> Vec<String>;

  /// Decode one data row. `line` is used for error messages only.
  fn from_fields(line: u64, fields: &csv::StringRecord) -> Result<Self>;
}

/// A column that gets parsed; surrounding whitespace is ignored.
fn field(fields: &csv::StringRecord, i: usize) -> &str { raw(fields, i).trim() }

/// A free-text column, kept exactly as written.
fn raw(fields: &csv::StringRecord, i: usize) -> &str { fields.get(i).unwrap_or("") }

fn parse_date(line: u64, column: &'static str, raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| Error::InvalidField {
    line,
    column,
    value: raw.to_owned(),
  })
}

fn parse_float(line: u64, column: &'static str, raw: &str) -> Result<f64> {
  raw.parse().map_err(|_| Error::InvalidField { line, column, value: raw.to_owned() })
}

/// Counts are accepted as `3` or `3.0`.
fn parse_count(line: u64, column: &'static str, raw: &str) -> Result<u32> {
  let invalid = || Error::InvalidField { line, column, value: raw.to_owned() };
  if let Ok(n) = raw.parse::<u32>() {
    return Ok(n);
  }
  let f: f64 = raw.parse().map_err(|_| invalid())?;
  if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) {
    Ok(f as u32)
  } else {
    Err(invalid())
  }
}

impl TableRow for KpiRecord {
  const HEADERS: &'static [&'static str] = KPI_HEADERS;

  fn to_fields(&self) -> Vec<String> {
    vec![
      self.date.format("%Y-%m-%d").to_string(),
      self.category.label().to_owned(),
      self.kpi.clone(),
      self.target.clone(),
      self.actual.clone(),
      self.status.label().to_owned(),
      self.notes.clone(),
    ]
  }

  fn from_fields(line: u64, fields: &csv::StringRecord) -> Result<Self> {
    Ok(KpiRecord {
      date:     parse_date(line, "Date", field(fields, 0))?,
      category: Category::parse(field(fields, 1))?,
      kpi:      raw(fields, 2).to_owned(),
      target:   raw(fields, 3).to_owned(),
      actual:   raw(fields, 4).to_owned(),
      status:   KpiStatus::parse(field(fields, 5))?,
      notes:    raw(fields, 6).to_owned(),
    })
  }
}

impl TableRow for CtqRecord {
  const HEADERS: &'static [&'static str] = CTQ_HEADERS;

  fn to_fields(&self) -> Vec<String> {
    let m = &self.measurements;
    vec![
      self.date.format("%Y-%m-%d").to_string(),
      m.defect_rate.to_string(),
      m.first_pass_yield.to_string(),
      m.downtime_events.to_string(),
      m.scrap_units.to_string(),
      m.calibration_misses.to_string(),
      self.health_score.to_string(),
      self.recommendation.label().to_owned(),
    ]
  }

  fn from_fields(line: u64, fields: &csv::StringRecord) -> Result<Self> {
    let score_raw = field(fields, 6);
    let health_score = u8::try_from(parse_count(line, CTQ_HEADERS[6], score_raw)?)
      .map_err(|_| Error::InvalidField {
        line,
        column: CTQ_HEADERS[6],
        value: score_raw.to_owned(),
      })?;

    Ok(CtqRecord {
      date: parse_date(line, "Date", field(fields, 0))?,
      measurements: CtqMeasurements {
        defect_rate:        parse_float(line, CTQ_HEADERS[1], field(fields, 1))?,
        first_pass_yield:   parse_float(line, CTQ_HEADERS[2], field(fields, 2))?,
        downtime_events:    parse_count(line, CTQ_HEADERS[3], field(fields, 3))?,
        scrap_units:        parse_count(line, CTQ_HEADERS[4], field(fields, 4))?,
        calibration_misses: parse_count(line, CTQ_HEADERS[5], field(fields, 5))?,
      },
      health_score,
      recommendation: Recommendation::parse(field(fields, 7))?,
    })
  }
}

// ─── Reading ─────────────────────────────────────────────────────────────────

/// Read a whole table. Input with no header row at all reads as empty.
pub fn read_table<T: TableRow, R: io::Read>(input: R) -> Result<Vec<T>> {
  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .trim(csv::Trim::Headers)
    .from_reader(input);

  let headers = reader.headers()?.clone();
  if headers.is_empty() {
    return Ok(Vec::new());
  }
  if !headers.iter().eq(T::HEADERS.iter().copied()) {
    return Err(Error::UnexpectedHeader {
      expected: T::HEADERS.join(","),
      found:    headers.iter().collect::<Vec<_>>().join(","),
    });
  }

  let mut rows = Vec::new();
  for record in reader.records() {
    let record = record?;
    let line = record.position().map_or(0, |p| p.line());
    if record.len() < T::HEADERS.len() {
      return Err(Error::ShortRow { line, expected: T::HEADERS.len(), found: record.len() });
    }
    rows.push(T::from_fields(line, &record)?);
  }
  Ok(rows)
}

// ─── Writing ─────────────────────────────────────────────────────────────────

/// Append `rows` to `output`, preceded by the header row when `with_header`.
pub fn write_rows<'a, T, W, I>(output: W, rows: I, with_header: bool) -> Result<W>
where
  T: TableRow + 'a,
  W: io::Write,
  I: IntoIterator<Item = &'a T>,
{
  let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(output);
  if with_header {
    writer.write_record(T::HEADERS)?;
  }
  for row in rows {
    writer.write_record(row.to_fields())?;
  }
  writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

/// The full KPI table as CSV bytes, header included.
pub fn kpi_csv(records: &[KpiRecord]) -> Result<Vec<u8>> {
  write_rows(Vec::new(), records, true)
}

/// The full CTQ table as CSV bytes, header included.
pub fn ctq_csv(records: &[CtqRecord]) -> Result<Vec<u8>> {
  write_rows(Vec::new(), records, true)
}
