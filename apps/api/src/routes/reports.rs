//! Date-range reports: `/api/ventaanual`, `/api/ventamensual`,
//! `/api/ventadiaria`.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;
use ventas_core::validation::{parse_day_range, parse_month_range, parse_year_range};

use crate::dto::{sale_views, SaleView};
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/ventaanual/{startYear}-{endYear}`
pub async fn by_year(
    State(state): State<AppState>,
    range: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<SaleView>>> {
    let Path(range) = range?;
    let range = parse_year_range(&range)?;

    let sales = state.ledger.sales_by_year(range).await?;
    debug!(start = range.start, end = range.end, count = sales.len(), "Sales by year");
    Ok(Json(sale_views(sales)))
}

/// `GET /api/ventamensual/{year}-{startMonth}-{endYear}-{endMonth}`
pub async fn by_month(
    State(state): State<AppState>,
    range: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<SaleView>>> {
    let Path(range) = range?;
    let range = parse_month_range(&range)?;

    let sales = state.ledger.sales_by_month(range).await?;
    debug!(start = ?range.start(), end = ?range.end(), count = sales.len(), "Sales by month");
    Ok(Json(sale_views(sales)))
}

/// `GET /api/ventadiaria/{y1}-{m1}-{d1}-{y2}-{m2}-{d2}`
pub async fn by_day(
    State(state): State<AppState>,
    range: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<SaleView>>> {
    let Path(range) = range?;
    let range = parse_day_range(&range)?;

    let sales = state.ledger.sales_by_day(range).await?;
    debug!(start = %range.start, end = %range.end, count = sales.len(), "Sales by day");
    Ok(Json(sale_views(sales)))
}
