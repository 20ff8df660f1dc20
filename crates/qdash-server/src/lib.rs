//! HTTP front end for the quality dashboard.
//!
//! Mounts the [`qdash_api`] router under `/api` with request tracing and an
//! upload size limit. Storage selection lives in the binary.

pub mod settings;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use qdash_api::ApiOptions;
use qdash_core::store::QualityStore;
use tower_http::trace::TraceLayer;

pub use settings::{ServerConfig, StorageKind};

/// Build the application router for `store`.
pub fn app<S>(store: Arc<S>, cfg: &ServerConfig) -> Router
where
  S: QualityStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let options = ApiOptions { recent_ctq: cfg.recent_ctq };
  Router::new()
    .nest("/api", qdash_api::api_router(store, options))
    .layer(DefaultBodyLimit::max(cfg.max_upload_bytes))
    .layer(TraceLayer::new_for_http())
}
