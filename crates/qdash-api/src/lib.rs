//! JSON REST API for the quality dashboard.
//!
//! Exposes an axum [`Router`] backed by any
//! [`qdash_core::store::QualityStore`]. Form rendering and chart drawing are
//! the client's business; this crate serves records, derived statuses and
//! chart series as JSON, plus CSV, XLSX and PDF downloads.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", qdash_api::api_router(store.clone(), ApiOptions::default()))
//! ```

pub mod ctq;
pub mod error;
pub mod extract;
pub mod kpi;
pub mod rework;

mod download;


use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use qdash_core::store::QualityStore;

pub use error::ApiError;
pub use extract::{ApiJson, ApiQuery};

/// Default number of CTQ days returned by `GET /ctq`.
pub const DEFAULT_RECENT_CTQ: usize = 10;

/// Tunables for the router.
#[derive(Debug, Clone, Copy)]
pub struct ApiOptions {
  /// Number of CTQ days returned by `GET /ctq` when no `limit` is given.
  pub recent_ctq: usize,
}

impl Default for ApiOptions {
  fn default() -> Self { Self { recent_ctq: DEFAULT_RECENT_CTQ } }
}

/// Shared handler state.
pub struct ApiState<S> {
  pub store:   Arc<S>,
  pub options: ApiOptions,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone(), options: self.options } }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, options: ApiOptions) -> Router<()>
where
  S: QualityStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // KPI recorder
    .route("/kpi", get(kpi::list::<S>).post(kpi::create::<S>))
    .route("/kpi/categories", get(kpi::categories))
    .route("/kpi/catalog", get(kpi::catalog))
    .route("/kpi/filters", get(kpi::filters::<S>))
    .route("/kpi/summary", get(kpi::summary::<S>))
    .route("/kpi/export.csv", get(kpi::export::<S>))
    // CTQ scorer
    .route("/ctq", get(ctq::list::<S>).post(ctq::create::<S>))
    .route("/ctq/export.csv", get(ctq::export::<S>))
    // Rework Pareto analyzer
    .route("/rework/pareto", post(rework::pareto))
    .route("/rework/pareto.xlsx", post(rework::pareto_xlsx))
    .route("/rework/pareto.pdf", post(rework::pareto_pdf))
    .with_state(ApiState { store, options })
}
