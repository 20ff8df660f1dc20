//! [`CsvStore`], the flat-file implementation of [`QualityStore`].

use std::{
  fs::{File, OpenOptions},
  io::{self, BufReader, Write as _},
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use qdash_core::{
  ctq::{CtqMeasurements, CtqRecord},
  kpi::{KpiEntry, KpiRecord},
  store::QualityStore,
};
use qdash_report::table::{TableRow, read_table, write_rows};

use crate::{Error, Result};

// ─── File helpers ────────────────────────────────────────────────────────────

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
  move |source| Error::Io { path: path.to_path_buf(), source }
}

fn table_error(path: &Path) -> impl FnOnce(qdash_report::Error) -> Error + '_ {
  move |source| Error::Table { path: path.to_path_buf(), source }
}

/// Append one row, writing the header first if the file is new or empty.
fn append_row<T: TableRow>(path: &Path, row: &T) -> Result<()> {
  let mut file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .map_err(io_error(path))?;
  let needs_header = file.metadata().map_err(io_error(path))?.len() == 0;

  // Serialise first so the row reaches the file in a single write.
  let buf = write_rows(Vec::new(), std::iter::once(row), needs_header)
    .map_err(table_error(path))?;
  file.write_all(&buf).map_err(io_error(path))?;
  file.sync_data().map_err(io_error(path))?;
  Ok(())
}

/// Read a whole table. A missing file is an empty table.
fn load_rows<T: TableRow>(path: &Path) -> Result<Vec<T>> {
  let file = match File::open(path) {
    Ok(f) => f,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => return Err(io_error(path)(e)),
  };
  read_table(BufReader::new(file)).map_err(table_error(path))
}

// ─── Store ───────────────────────────────────────────────────────────────────

struct Tables {
  kpi_path: PathBuf,
  ctq_path: PathBuf,
  /// Serialises file access within this process.
  lock:     Mutex<()>,
}

/// KPI and CTQ tables kept as two CSV files.
///
/// Clones share the same paths and lock.
#[derive(Clone)]
pub struct CsvStore {
  tables: Arc<Tables>,
}

impl CsvStore {
  /// Use the given files. Nothing is created until the first append.
  pub fn new(kpi_path: impl Into<PathBuf>, ctq_path: impl Into<PathBuf>) -> Self {
    Self {
      tables: Arc::new(Tables {
        kpi_path: kpi_path.into(),
        ctq_path: ctq_path.into(),
        lock:     Mutex::new(()),
      }),
    }
  }

  pub fn kpi_path(&self) -> &Path { &self.tables.kpi_path }

  pub fn ctq_path(&self) -> &Path { &self.tables.ctq_path }

  /// Run `f` on the blocking pool while holding the table lock.
  async fn with_tables<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Tables) -> Result<T> + Send + 'static,
  {
    let tables = Arc::clone(&self.tables);
    tokio::task::spawn_blocking(move || {
      let _guard = tables.lock.lock().map_err(|_| Error::Poisoned)?;
      f(&tables)
    })
    .await?
  }
}

// ─── QualityStore impl ───────────────────────────────────────────────────────

impl QualityStore for CsvStore {
  type Error = Error;

  async fn record_kpi(&self, entry: KpiEntry) -> Result<KpiRecord> {
    let (record, _) = KpiRecord::evaluate(entry);
    let row = record.clone();
    self.with_tables(move |t| append_row(&t.kpi_path, &row)).await?;

    tracing::debug!(kpi = %record.kpi, status = %record.status, "kpi row appended");
    Ok(record)
  }

  async fn record_ctq(
    &self,
    date:         NaiveDate,
    measurements: CtqMeasurements,
  ) -> Result<CtqRecord> {
    let record = CtqRecord::evaluate(date, measurements)?;
    let row = record.clone();
    self.with_tables(move |t| append_row(&t.ctq_path, &row)).await?;

    tracing::debug!(date = %record.date, score = record.health_score, "ctq row appended");
    Ok(record)
  }

  async fn load_kpi(&self) -> Result<Vec<KpiRecord>> {
    self.with_tables(|t| load_rows(&t.kpi_path)).await
  }

  async fn load_ctq(&self) -> Result<Vec<CtqRecord>> {
    self.with_tables(|t| load_rows(&t.ctq_path)).await
  }
}
