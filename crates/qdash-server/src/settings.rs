//! Server configuration.
//!
//! Layered lowest to highest: built-in defaults, the TOML file, then
//! `QDASH_*` environment variables (`QDASH_PORT`, `QDASH_STORAGE`, ...).

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Which backend holds the KPI and CTQ tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
  /// Two CSV files, one per table.
  #[default]
  Csv,
  /// One SQLite database.
  Sqlite,
}

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub storage:          StorageKind,
  pub kpi_csv:          PathBuf,
  pub ctq_csv:          PathBuf,
  pub sqlite_path:      PathBuf,
  /// Largest accepted request body, mainly for rework log uploads.
  pub max_upload_bytes: usize,
  /// CTQ days returned by `GET /api/ctq` without a `limit`.
  pub recent_ctq:       usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             8501,
      storage:          StorageKind::Csv,
      kpi_csv:          PathBuf::from("kpi_records.csv"),
      ctq_csv:          PathBuf::from("daily_ctq_records.csv"),
      sqlite_path:      PathBuf::from("qdash.sqlite3"),
      max_upload_bytes: 8 * 1024 * 1024,
      recent_ctq:       qdash_api::DEFAULT_RECENT_CTQ,
    }
  }
}

impl ServerConfig {
  /// Load from `path` (optional) and the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("QDASH"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}
