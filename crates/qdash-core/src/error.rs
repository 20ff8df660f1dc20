//! Error types for `qdash-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{field} must be between {min} and {max}, got {value}")]
  OutOfRange {
    field: &'static str,
    value: f64,
    min:   f64,
    max:   f64,
  },

  #[error("unknown KPI category: {0:?}")]
  UnknownCategory(String),

  #[error("unknown KPI status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown recommendation: {0:?}")]
  UnknownRecommendation(String),

  #[error("invalid month filter {0:?}, expected YYYY-MM")]
  InvalidMonth(String),

  #[error("date range start {start} is after end {end}")]
  InvertedRange {
    start: chrono::NaiveDate,
    end:   chrono::NaiveDate,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
