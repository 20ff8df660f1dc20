//! Flat-file backend for the quality dashboard tables.
//!
//! Keeps the KPI and CTQ tables as two CSV files that spreadsheet users can
//! open directly. Records are appended one row at a time; the files are never
//! rewritten. File I/O runs on tokio's blocking pool.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::CsvStore;

#[cfg(test)]
mod tests;
