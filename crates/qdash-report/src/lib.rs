//! Tabular codecs for the quality dashboard.
//!
//! Reads uploaded rework logs, reads and writes the KPI / CTQ tables in their
//! CSV layout, and renders a Pareto report as a spreadsheet or PDF. Pure
//! synchronous; no HTTP or async dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use qdash_core::pareto::{aggregate, ParetoView};
//! use qdash_core::rework::DateRange;
//!
//! let log = b"Discard reason,Rework Date\nScratch,2024-03-01\n";
//! let entries = qdash_report::read_rework_csv(&log[..]).unwrap();
//! let report = aggregate(&entries, DateRange::spanning(&entries));
//! let xlsx = qdash_report::pareto_xlsx(&report, ParetoView::Customer).unwrap();
//! println!("{} bytes", xlsx.len());
//! ```

pub mod error;
mod pdf;
mod rework;
pub mod table;
mod xlsx;

pub use error::{Error, Result};
pub use pdf::{pareto_pdf, pdf_lines, DEFAULT_TITLE};
pub use rework::{read_rework_csv, DATE_COLUMN, REASON_COLUMN};
pub use table::{ctq_csv, kpi_csv};
pub use xlsx::pareto_xlsx;
