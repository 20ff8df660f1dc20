//! Handlers for `/kpi` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/kpi/categories` | The seven category labels |
//! | `GET`  | `/kpi/catalog` | Suggested KPI names, targets and comparators; optional `?category` |
//! | `POST` | `/kpi` | Body: [`NewKpiBody`]; returns 201 + [`KpiSubmission`] |
//! | `GET`  | `/kpi` | Optional `?category` and `?month=YYYY-MM` filters |
//! | `GET`  | `/kpi/filters` | Categories and months present in the table |
//! | `GET`  | `/kpi/summary` | Status overview under the same filters as `GET /kpi` |
//! | `GET`  | `/kpi/export.csv` | The whole table as CSV |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use qdash_core::{
  catalog::{self, CatalogEntry},
  kpi::{
    self, Assessment, Category, Comparator, KpiEntry, KpiFilter, KpiRecord, KpiStatus, Month,
    StatusShare, StatusSummary,
  },
  store::QualityStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  ApiState, download,
  error::ApiError,
  extract::{ApiJson, ApiQuery},
};

// ─── Form options ─────────────────────────────────────────────────────────────

/// `GET /kpi/categories`
pub async fn categories() -> Json<Vec<Category>> { Json(Category::all()) }

#[derive(Debug, Deserialize)]
pub struct CatalogParams {
  pub category: Option<Category>,
}

/// A catalog suggestion together with how its target will be compared.
#[derive(Debug, Serialize)]
pub struct CatalogItem {
  #[serde(flatten)]
  pub entry:      CatalogEntry,
  pub comparator: Comparator,
}

impl From<&CatalogEntry> for CatalogItem {
  fn from(entry: &CatalogEntry) -> Self {
    Self { entry: *entry, comparator: entry.comparator() }
  }
}

/// `GET /kpi/catalog[?category=...]`
pub async fn catalog(ApiQuery(params): ApiQuery<CatalogParams>) -> Json<Vec<CatalogItem>> {
  let items = match params.category {
    Some(c) => catalog::for_category(c).map(CatalogItem::from).collect(),
    None => catalog::CATALOG.iter().map(CatalogItem::from).collect(),
  };
  Json(items)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /kpi`.
#[derive(Debug, Deserialize)]
pub struct NewKpiBody {
  /// Defaults to today (server local time).
  pub date:     Option<NaiveDate>,
  pub category: Category,
  pub kpi:      String,
  pub target:   String,
  pub actual:   String,
  #[serde(default)]
  pub notes:    String,
}

impl From<NewKpiBody> for KpiEntry {
  fn from(b: NewKpiBody) -> Self {
    KpiEntry {
      date:     b.date.unwrap_or_else(|| Local::now().date_naive()),
      category: b.category,
      kpi:      b.kpi,
      target:   b.target,
      actual:   b.actual,
      notes:    b.notes,
    }
  }
}

/// Response of `POST /kpi`.
#[derive(Debug, Serialize)]
pub struct KpiSubmission {
  pub record:     KpiRecord,
  /// How the status was reached.
  pub assessment: Assessment,
  pub message:    String,
}

/// `POST /kpi`: returns 201 + the stored record and its assessment.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewKpiBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: QualityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = KpiEntry::from(body);
  if entry.kpi.trim().is_empty() {
    return Err(ApiError::BadRequest("KPI name must not be empty".into()));
  }

  // Re-derived here so the caller learns why; the store derives the same
  // status from the same strings.
  let assessment = kpi::assess(&entry.target, &entry.actual);
  let record = state.store.record_kpi(entry).await.map_err(ApiError::store)?;

  if record.status == KpiStatus::CheckData {
    tracing::warn!(
      kpi = %record.kpi,
      target = %record.target,
      actual = %record.actual,
      "KPI values could not be compared"
    );
  } else {
    tracing::info!(kpi = %record.kpi, status = %record.status, "KPI recorded");
  }

  let message = format!("KPI for {} on {} saved.", record.kpi, record.date);
  Ok((StatusCode::CREATED, Json(KpiSubmission { record, assessment, message })))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// Filters shared by `GET /kpi` and `GET /kpi/summary`. Absent means "All".
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
  pub category: Option<Category>,
  /// `YYYY-MM`.
  pub month:    Option<Month>,
}

impl From<FilterParams> for KpiFilter {
  fn from(p: FilterParams) -> Self { KpiFilter { category: p.category, month: p.month } }
}

async fn load<S>(state: &ApiState<S>) -> Result<Vec<KpiRecord>, ApiError>
where
  S: QualityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state.store.load_kpi().await.map_err(ApiError::store)
}

/// `GET /kpi[?category=...][&month=YYYY-MM]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<FilterParams>,
) -> Result<Json<Vec<KpiRecord>>, ApiError>
where
  S: QualityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let filter = KpiFilter::from(params);
  let records = load(&state).await?;
  Ok(Json(filter.apply(&records).into_iter().cloned().collect()))
}

/// Response of `GET /kpi/filters`.
#[derive(Debug, Serialize)]
pub struct FilterOptions {
  pub categories: Vec<Category>,
  pub months:     Vec<Month>,
}

/// `GET /kpi/filters`
pub async fn filters<S>(State(state): State<ApiState<S>>) -> Result<Json<FilterOptions>, ApiError>
where
  S: QualityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = load(&state).await?;
  Ok(Json(FilterOptions {
    categories: kpi::available_categories(&records),
    months:     kpi::available_months(&records),
  }))
}

/// Response of `GET /kpi/summary`.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
  pub total:   usize,
  pub summary: StatusSummary,
  /// Chart slices; empty when nothing matches.
  pub shares:  Vec<StatusShare>,
}

/// `GET /kpi/summary[?category=...][&month=YYYY-MM]`
pub async fn summary<S>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<FilterParams>,
) -> Result<Json<SummaryResponse>, ApiError>
where
  S: QualityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let filter = KpiFilter::from(params);
  let records = load(&state).await?;
  let summary = StatusSummary::tally(filter.apply(&records));
  Ok(Json(SummaryResponse { total: summary.total(), shares: summary.shares(), summary }))
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// `GET /kpi/export.csv`
pub async fn export<S>(State(state): State<ApiState<S>>) -> Result<Response, ApiError>
where
  S: QualityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = load(&state).await?;
  let bytes = qdash_report::kpi_csv(&records).map_err(ApiError::Export)?;
  Ok(download::attachment(download::CSV, "kpi_records.csv", bytes))
}
