//! Handlers for `/rework` endpoints.
//!
//! Each request carries the rework log as its raw CSV body (columns
//! `Discard reason` and `Rework Date`). Nothing is stored.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/rework/pareto` | JSON [`ParetoAnalysis`] |
//! | `POST` | `/rework/pareto.xlsx` | Spreadsheet of the table |
//! | `POST` | `/rework/pareto.pdf` | Text summary; optional `?title` |
//!
//! All three accept `?start`, `?end` (`YYYY-MM-DD`, default to the log's own
//! span), `?view=internal|customer` and, for JSON, `?metric=percentage|ppm`.

use axum::{Json, response::Response};
use bytes::Bytes;
use chrono::NaiveDate;
use qdash_core::{
  pareto::{self, ChartMetric, ChartPoint, DisplayRow, ParetoReport, ParetoView},
  rework::DateRange,
};
use serde::{Deserialize, Serialize};

use crate::{download, error::ApiError, extract::ApiQuery};

#[derive(Debug, Default, Deserialize)]
pub struct ParetoParams {
  pub start:  Option<NaiveDate>,
  pub end:    Option<NaiveDate>,
  #[serde(default)]
  pub view:   ParetoView,
  #[serde(default)]
  pub metric: ChartMetric,
  pub title:  Option<String>,
}

fn analyse(params: &ParetoParams, body: &[u8]) -> Result<ParetoReport, ApiError> {
  let entries = qdash_report::read_rework_csv(body)
    .map_err(|e| ApiError::BadRequest(format!("rework log: {e}")))?;
  let range = DateRange::resolve(params.start, params.end, &entries)?;
  let report = pareto::aggregate(&entries, range);

  if report.excluded_undated > 0 {
    tracing::warn!(
      excluded = report.excluded_undated,
      "rework entries without a readable date were left out"
    );
  }
  tracing::debug!(
    entries = entries.len(),
    counted = report.total,
    reasons = report.rows.len(),
    "pareto analysed"
  );
  Ok(report)
}

/// Response of `POST /rework/pareto`.
#[derive(Debug, Serialize)]
pub struct ParetoAnalysis {
  /// `None` when the log had no readable dates.
  pub range:            Option<DateRange>,
  pub total:            usize,
  pub excluded_undated: usize,
  pub out_of_range:     usize,
  pub view:             ParetoView,
  pub columns:          &'static [&'static str],
  pub rows:             Vec<DisplayRow>,
  pub metric:           ChartMetric,
  pub chart:            Vec<ChartPoint>,
}

/// `POST /rework/pareto`
pub async fn pareto(
  ApiQuery(params): ApiQuery<ParetoParams>,
  body: Bytes,
) -> Result<Json<ParetoAnalysis>, ApiError> {
  let report = analyse(&params, &body)?;
  Ok(Json(ParetoAnalysis {
    range:            report.range,
    total:            report.total,
    excluded_undated: report.excluded_undated,
    out_of_range:     report.out_of_range,
    view:             params.view,
    columns:          params.view.columns(),
    rows:             report.display_rows(params.view),
    metric:           params.metric,
    chart:            report.chart(params.metric),
  }))
}

/// `POST /rework/pareto.xlsx`
pub async fn pareto_xlsx(
  ApiQuery(params): ApiQuery<ParetoParams>,
  body: Bytes,
) -> Result<Response, ApiError> {
  let report = analyse(&params, &body)?;
  let bytes = qdash_report::pareto_xlsx(&report, params.view).map_err(ApiError::Export)?;
  Ok(download::attachment(download::XLSX, "pareto_table.xlsx", bytes))
}

/// `POST /rework/pareto.pdf[?title=...]`
pub async fn pareto_pdf(
  ApiQuery(params): ApiQuery<ParetoParams>,
  body: Bytes,
) -> Result<Response, ApiError> {
  let report = analyse(&params, &body)?;
  let title = params.title.as_deref().unwrap_or(qdash_report::DEFAULT_TITLE);
  let bytes =
    qdash_report::pareto_pdf(&report, params.view, title).map_err(ApiError::Export)?;
  Ok(download::attachment(download::PDF, "pareto_summary.pdf", bytes))
}
