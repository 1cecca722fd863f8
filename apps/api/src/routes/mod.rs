//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /api/productos                       products::list            │
//! │  POST   /api/ventas                          sales::create             │
//! │  GET    /api/ventas/{id}                     sales::get                │
//! │  DELETE /api/ventas/{id}                     sales::delete             │
//! │  PUT    /api/ventas/{id}/updateFecha         sales::update_date        │
//! │  PUT    /api/ventas/{id}/updateVenta         sales::update             │
//! │  GET    /api/ventas/producto/{productoId}    sales::by_product         │
//! │  GET    /api/ventaanual/{range}              reports::by_year          │
//! │  GET    /api/ventamensual/{range}            reports::by_month         │
//! │  GET    /api/ventadiaria/{range}             reports::by_day           │
//! │  GET    /health                              health::check             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Range segments (`2023-2024`, `2023-3-2023-5`, ...) are captured whole and
//! parsed by `ventas_core::validation`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod products;
pub mod reports;
pub mod sales;

/// All API routes, state still unbound.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/productos", get(products::list))
        .route("/api/ventas", post(sales::create))
        .route("/api/ventas/{id}", get(sales::get).delete(sales::delete))
        .route("/api/ventas/{id}/updateFecha", put(sales::update_date))
        .route("/api/ventas/{id}/updateVenta", put(sales::update))
        .route("/api/ventas/producto/{producto_id}", get(sales::by_product))
        .route("/api/ventaanual/{range}", get(reports::by_year))
        .route("/api/ventamensual/{range}", get(reports::by_month))
        .route("/api/ventadiaria/{range}", get(reports::by_day))
        .route("/health", get(health::check))
}
