//! Sale endpoints under `/api/ventas`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tracing::debug;
use ventas_core::validation::parse_sale_date;
use ventas_core::{ProductId, SaleId};

use crate::dto::{
    product_ids, sale_views, CreateSaleRequest, DeletedView, PatchSaleRequest, SaleDetail,
    SaleView, UpdateDateRequest,
};
use crate::error::ApiResult;
use crate::links::{after_delete_links, sale_path, PRODUCTS_PATH};
use crate::state::AppState;

/// `GET /api/ventas/{id}`
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<SaleId>, PathRejection>,
) -> ApiResult<Json<SaleDetail>> {
    let Path(id) = id?;
    let sale = state.ledger.get(id).await?;
    Ok(Json(SaleDetail::from(sale)))
}

/// `POST /api/ventas`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateSaleRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;

    let ids = product_ids(&body.productos);
    let date = parse_sale_date(body.fecha_venta.as_deref().unwrap_or_default())?;

    let sale = state.ledger.create(&ids, date).await?;
    let location = sale_path(sale.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(SaleView::from(sale)),
    ))
}

/// `PUT /api/ventas/{id}/updateFecha`
pub async fn update_date(
    State(state): State<AppState>,
    id: Result<Path<SaleId>, PathRejection>,
    body: Result<Json<UpdateDateRequest>, JsonRejection>,
) -> ApiResult<Json<SaleView>> {
    let Path(id) = id?;
    let Json(body) = body?;

    let sale = state
        .ledger
        .replace_date(id, body.fecha_venta.as_deref())
        .await?;
    Ok(Json(SaleView::from(sale)))
}

/// `PUT /api/ventas/{id}/updateVenta`
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<SaleId>, PathRejection>,
    body: Result<Json<PatchSaleRequest>, JsonRejection>,
) -> ApiResult<Json<SaleView>> {
    let Path(id) = id?;
    let Json(body) = body?;

    let ids = body.productos.as_deref().map(product_ids);
    let sale = state
        .ledger
        .patch(id, body.fecha_venta.as_deref(), ids)
        .await?;
    Ok(Json(SaleView::from(sale)))
}

/// `DELETE /api/ventas/{id}`
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<SaleId>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    state.ledger.delete(id).await?;

    let body = DeletedView {
        message: "Venta eliminada".to_string(),
        links: after_delete_links(),
    };
    Ok(([(header::LOCATION, PRODUCTS_PATH)], Json(body)))
}

/// `GET /api/ventas/producto/{productoId}`
pub async fn by_product(
    State(state): State<AppState>,
    product_id: Result<Path<ProductId>, PathRejection>,
) -> ApiResult<Json<Vec<SaleView>>> {
    let Path(product_id) = product_id?;
    let sales = state.ledger.sales_by_product(product_id).await?;
    debug!(product_id, count = sales.len(), "Sales by product");
    Ok(Json(sale_views(sales)))
}
