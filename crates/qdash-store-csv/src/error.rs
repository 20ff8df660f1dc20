//! Error type for `qdash-store-csv`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] qdash_core::Error),

  #[error("{path}: {source}")]
  Table {
    path:   PathBuf,
    #[source]
    source: qdash_report::Error,
  },

  #[error("{path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("blocking task failed: {0}")]
  Join(#[from] tokio::task::JoinError),

  #[error("table lock poisoned")]
  Poisoned,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
