//! # Request and Response Bodies
//!
//! JSON shapes of the HTTP API. Field names are the public wire names
//! (`nombre`, `precio`, `productos`, `fechaVenta`, `totalVenta`).
//!
//! ```text
//! SaleView
//! {
//!   "id": 1,
//!   "productos": [ { "id": 1, "nombre": "Café", "precio": "15.00" } ],
//!   "fechaVenta": "2023-03-10",
//!   "totalVenta": "15.00",
//!   "_links": { "self": { "href": "/api/ventas/1" }, ... }
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ventas_core::{query, Money, Product, ProductId, Sale, SaleId};

use crate::links::{product_links, sale_links, Links};

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub nombre: String,
    pub precio: Money,

    /// Present on catalog listings, omitted inside a sale.
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl ProductView {
    /// Catalog entry with its links.
    pub fn catalog(product: Product) -> Self {
        let links = product_links(product.id);
        ProductView {
            links: Some(links),
            ..Self::line(product)
        }
    }

    /// Product as a line of a sale.
    pub fn line(product: Product) -> Self {
        ProductView {
            id: product.id,
            nombre: product.name,
            precio: product.price,
            links: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    pub id: SaleId,
    pub productos: Vec<ProductView>,
    pub fecha_venta: NaiveDate,
    pub total_venta: Money,

    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<Sale> for SaleView {
    fn from(sale: Sale) -> Self {
        let total_venta = query::total(&sale);
        SaleView {
            id: sale.id,
            links: sale_links(sale.id),
            productos: sale.products.into_iter().map(ProductView::line).collect(),
            fecha_venta: sale.date,
            total_venta,
        }
    }
}

pub fn sale_views(sales: Vec<Sale>) -> Vec<SaleView> {
    sales.into_iter().map(SaleView::from).collect()
}

/// `GET /api/ventas/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct SaleDetail {
    pub venta: SaleView,
    pub total: Money,
}

impl From<Sale> for SaleDetail {
    fn from(sale: Sale) -> Self {
        let venta = SaleView::from(sale);
        SaleDetail {
            total: venta.total_venta,
            venta,
        }
    }
}

/// `DELETE /api/ventas/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct DeletedView {
    pub message: String,

    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthView {
    pub status: &'static str,
    pub storage: &'static str,
}

// =============================================================================
// Requests
// =============================================================================

/// A product reference: a bare id or an `{ "id": n }` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(ProductId),
    Object { id: ProductId },
}

impl ProductRef {
    pub fn id(self) -> ProductId {
        match self {
            ProductRef::Id(id) | ProductRef::Object { id } => id,
        }
    }
}

pub fn product_ids(refs: &[ProductRef]) -> Vec<ProductId> {
    refs.iter().map(|r| r.id()).collect()
}

/// `POST /api/ventas`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    #[serde(default)]
    pub productos: Vec<ProductRef>,

    #[serde(default)]
    pub fecha_venta: Option<String>,
}

/// `PUT /api/ventas/{id}/updateFecha`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDateRequest {
    #[serde(default)]
    pub fecha_venta: Option<String>,
}

/// `PUT /api/ventas/{id}/updateVenta`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchSaleRequest {
    #[serde(default)]
    pub fecha_venta: Option<String>,

    #[serde(default)]
    pub productos: Option<Vec<ProductRef>>,
}
