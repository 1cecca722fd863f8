//! Hypermedia links for response views.
//!
//! Every view carries a `_links` object of `{ "rel": { "href": "..." } }`
//! entries. Hrefs are paths relative to the server root.

use std::collections::BTreeMap;

use serde::Serialize;
use ventas_core::{ProductId, SaleId};

pub const PRODUCTS_PATH: &str = "/api/productos";
pub const SALES_PATH: &str = "/api/ventas";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

/// Relation name → link. Serialized in relation-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<&'static str, Link>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rel: &'static str, href: impl Into<String>) -> Self {
        self.0.insert(rel, Link { href: href.into() });
        self
    }
}

pub fn sale_path(id: SaleId) -> String {
    format!("{SALES_PATH}/{id}")
}

pub fn sales_by_product_path(product_id: ProductId) -> String {
    format!("{SALES_PATH}/producto/{product_id}")
}

/// Links for a single sale.
pub fn sale_links(id: SaleId) -> Links {
    let path = sale_path(id);
    Links::new()
        .with("self", path.clone())
        .with("detalle-venta", path.clone())
        .with("update-venta", format!("{path}/updateVenta"))
        .with("delete-venta", path)
        .with("listar-productos", PRODUCTS_PATH)
        .with("crear-venta", SALES_PATH)
}

/// Links for a catalog product.
pub fn product_links(id: ProductId) -> Links {
    Links::new()
        .with("self", PRODUCTS_PATH)
        .with("ventas-por-producto", sales_by_product_path(id))
        .with("listar-productos", PRODUCTS_PATH)
        .with("crear-venta", SALES_PATH)
}

/// Links returned after a sale was deleted.
pub fn after_delete_links() -> Links {
    Links::new()
        .with("listar-productos", PRODUCTS_PATH)
        .with("crear-venta", SALES_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_links() {
        let json = serde_json::to_value(sale_links(7)).unwrap();
        assert_eq!(json["self"]["href"], "/api/ventas/7");
        assert_eq!(json["update-venta"]["href"], "/api/ventas/7/updateVenta");
        assert_eq!(json["crear-venta"]["href"], "/api/ventas");
    }

    #[test]
    fn test_links_serialize_as_hal() {
        let json = serde_json::to_value(product_links(3)).unwrap();
        assert_eq!(json["ventas-por-producto"]["href"], "/api/ventas/producto/3");
    }
}
