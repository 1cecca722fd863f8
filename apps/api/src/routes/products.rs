use axum::extract::State;
use axum::Json;
use tracing::debug;

use crate::dto::ProductView;
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/productos`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductView>>> {
    let products = state.ledger.list_products().await?;
    debug!(count = products.len(), "Listing products");
    Ok(Json(products.into_iter().map(ProductView::catalog).collect()))
}
