//! Handlers for `/ctq` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/ctq` | Body: [`NewCtqBody`]; returns 201 + [`CtqSubmission`] |
//! | `GET`  | `/ctq` | Most recent days, oldest first; `?limit` defaults to the configured count |
//! | `GET`  | `/ctq/export.csv` | The whole table as CSV |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use qdash_core::{
  ctq::{CtqMeasurements, CtqRecord},
  store::QualityStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  ApiState, download,
  error::ApiError,
  extract::{ApiJson, ApiQuery},
};

/// JSON body accepted by `POST /ctq`. Omitted measurements take the form's
/// initial values.
#[derive(Debug, Deserialize)]
pub struct NewCtqBody {
  /// Defaults to today (server local time).
  pub date:         Option<NaiveDate>,
  #[serde(flatten)]
  pub measurements: CtqMeasurements,
}

/// Response of `POST /ctq`.
#[derive(Debug, Serialize)]
pub struct CtqSubmission {
  pub record: CtqRecord,
  /// The line shown to the operator, e.g. `"Monitor closely."`.
  pub advice: &'static str,
}

/// `POST /ctq`: returns 201 + the scored day.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewCtqBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: QualityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let date = body.date.unwrap_or_else(|| Local::now().date_naive());
  let measurements = body.measurements;
  // Validated up front so bad input maps to 400 rather than a store error.
  measurements.validate()?;

  let record = state.store.record_ctq(date, measurements).await.map_err(ApiError::store)?;
  tracing::info!(
    %date,
    score = record.health_score,
    recommendation = %record.recommendation,
    "CTQ day recorded"
  );

  let advice = record.recommendation.advice();
  Ok((StatusCode::CREATED, Json(CtqSubmission { record, advice })))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /ctq[?limit=N]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<CtqRecord>>, ApiError>
where
  S: QualityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let limit = params.limit.unwrap_or(state.options.recent_ctq);
  let mut records = state.store.load_ctq().await.map_err(ApiError::store)?;
  let skip = records.len().saturating_sub(limit);
  records.drain(..skip);
  Ok(Json(records))
}

/// `GET /ctq/export.csv`
pub async fn export<S>(State(state): State<ApiState<S>>) -> Result<Response, ApiError>
where
  S: QualityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = state.store.load_ctq().await.map_err(ApiError::store)?;
  let bytes = qdash_report::ctq_csv(&records).map_err(ApiError::Export)?;
  Ok(download::attachment(download::CSV, "daily_ctq_records.csv", bytes))
}
