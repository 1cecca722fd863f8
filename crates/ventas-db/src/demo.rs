//! Demo catalog used by the `seed` binary and by `storage.seed_demo_catalog`.

use rust_decimal::Decimal;
use tracing::info;
use ventas_core::{Money, Product};

use crate::error::LedgerResult;
use crate::ledger::Ledger;

/// (id, name, price in cents)
const DEMO_PRODUCTS: &[(i64, &str, i64)] = &[
    (1, "Café americano", 1500),
    (2, "Tarta de queso", 2500),
    (3, "Té verde", 450),
    (4, "Croissant", 320),
    (5, "Zumo de naranja", 680),
    (6, "Bocadillo de jamón", 950),
    (7, "Agua mineral", 150),
    (8, "Magdalena", 175),
];

/// The demo products, prices with two decimal places.
pub fn demo_catalog() -> Vec<Product> {
    DEMO_PRODUCTS
        .iter()
        .map(|&(id, name, cents)| Product::new(id, name, Money::new(Decimal::new(cents, 2))))
        .collect()
}

/// Adds the demo products to an empty catalog. Returns how many were added;
/// a catalog that already has products is left alone.
pub async fn seed_demo_catalog(ledger: &Ledger) -> LedgerResult<usize> {
    let existing = ledger.product_count().await?;
    if existing > 0 {
        info!(existing, "Catalog already populated, skipping demo seed");
        return Ok(0);
    }

    let products = demo_catalog();
    let count = products.len();
    for product in products {
        ledger.add_product(product).await?;
    }

    info!(count, "Demo catalog seeded");
    Ok(count)
}
