//! Error types for the qdash-report codecs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("{0}")]
  Core(#[from] qdash_core::Error),

  #[error("missing column {0:?}")]
  MissingColumn(&'static str),

  #[error("unexpected header: expected {expected:?}, found {found:?}")]
  UnexpectedHeader { expected: String, found: String },

  #[error("line {line}: expected {expected} fields, found {found}")]
  ShortRow { line: u64, expected: usize, found: usize },

  #[error("line {line}: invalid {column} value {value:?}")]
  InvalidField {
    line:   u64,
    column: &'static str,
    value:  String,
  },

  #[error("spreadsheet error: {0}")]
  Xlsx(#[from] rust_xlsxwriter::XlsxError),

  #[error("PDF error: {0}")]
  Pdf(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
