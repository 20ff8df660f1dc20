//! qdash server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! configured store, and serves the dashboard API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use qdash_core::store::QualityStore;
use qdash_server::{ServerConfig, StorageKind};
use qdash_store_csv::CsvStore;
use qdash_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Manufacturing quality dashboard server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  match cfg.storage {
    StorageKind::Csv => {
      let kpi = expand_tilde(&cfg.kpi_csv);
      let ctq = expand_tilde(&cfg.ctq_csv);
      tracing::info!(?kpi, ?ctq, "using CSV tables");
      serve(CsvStore::new(kpi, ctq), &cfg).await
    }
    StorageKind::Sqlite => {
      let path = expand_tilde(&cfg.sqlite_path);
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      tracing::info!(?path, "using SQLite store");
      serve(store, &cfg).await
    }
  }
}

async fn serve<S>(store: S, cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: QualityStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let app = qdash_server::app(Arc::new(store), cfg);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
