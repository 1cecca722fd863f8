//! # In-Memory Store
//!
//! A [`Catalog`] and [`SaleStore`] kept in process memory, for tests, demos
//! and `storage.backend = "memory"`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Arc<RwLock<MemoryState>>                                               │
//! │  ├── products:     BTreeMap<ProductId, Product>                        │
//! │  ├── sales:        BTreeMap<SaleId, StoredSale>  (ids only)            │
//! │  └── next_sale_id: strictly increasing, never reused                   │
//! │                                                                         │
//! │  Readers share the lock; every mutation takes it exclusively.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Like the SQLite schema, a sale keeps only product ids; reads join the
//! current catalog records back in.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;
use ventas_core::{Product, ProductId, Sale, SaleId};

use super::{Catalog, SaleStore};
use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
struct StoredSale {
    date: NaiveDate,
    product_ids: Vec<ProductId>,
}

#[derive(Debug)]
struct MemoryState {
    products: BTreeMap<ProductId, Product>,
    sales: BTreeMap<SaleId, StoredSale>,
    next_sale_id: SaleId,
}

impl Default for MemoryState {
    fn default() -> Self {
        MemoryState {
            products: BTreeMap::new(),
            sales: BTreeMap::new(),
            next_sale_id: 1,
        }
    }
}

impl MemoryState {
    fn resolve(&self, id: SaleId, stored: &StoredSale) -> DbResult<Sale> {
        let products = stored
            .product_ids
            .iter()
            .map(|pid| {
                self.products.get(pid).cloned().ok_or_else(|| {
                    DbError::Internal(format!("sale {id} references missing product {pid}"))
                })
            })
            .collect::<DbResult<Vec<_>>>()?;
        Ok(Sale::new(id, products, stored.date))
    }

    /// Same rule as the `sale_products` foreign key.
    fn check_references(&self, products: &[Product]) -> DbResult<()> {
        match products.iter().find(|p| !self.products.contains_key(&p.id)) {
            Some(p) => Err(DbError::ForeignKeyViolation {
                message: format!("product {} does not exist", p.id),
            }),
            None => Ok(()),
        }
    }
}

/// In-memory backend. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `products`. Later duplicates win.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let state = MemoryState {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            ..Default::default()
        };
        MemoryStore {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

#[async_trait]
impl Catalog for MemoryStore {
    async fn list(&self) -> DbResult<Vec<Product>> {
        let state = self.state.read().await;
        Ok(state.products.values().cloned().collect())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> DbResult<Vec<Product>> {
        let state = self.state.read().await;
        // BTreeMap iteration gives id order and each product once
        Ok(state
            .products
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn insert(&self, product: &Product) -> DbResult<()> {
        let mut state = self.state.write().await;
        if state.products.contains_key(&product.id) {
            return Err(DbError::duplicate("product id", product.id));
        }
        debug!(id = product.id, name = %product.name, "Inserting product");
        state.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn count(&self) -> DbResult<i64> {
        let state = self.state.read().await;
        Ok(state.products.len() as i64)
    }
}

#[async_trait]
impl SaleStore for MemoryStore {
    async fn get(&self, id: SaleId) -> DbResult<Option<Sale>> {
        let state = self.state.read().await;
        state
            .sales
            .get(&id)
            .map(|stored| state.resolve(id, stored))
            .transpose()
    }

    async fn list(&self) -> DbResult<Vec<Sale>> {
        let state = self.state.read().await;
        state
            .sales
            .iter()
            .map(|(id, stored)| state.resolve(*id, stored))
            .collect()
    }

    async fn insert(&self, date: NaiveDate, products: &[Product]) -> DbResult<Sale> {
        let mut state = self.state.write().await;
        state.check_references(products)?;

        let id = state.next_sale_id;
        state.next_sale_id += 1;
        state.sales.insert(
            id,
            StoredSale {
                date,
                product_ids: products.iter().map(|p| p.id).collect(),
            },
        );

        debug!(id, %date, products = products.len(), "Inserted sale");
        Ok(Sale::new(id, products.to_vec(), date))
    }

    async fn update(&self, sale: &Sale) -> DbResult<()> {
        let mut state = self.state.write().await;
        state.check_references(&sale.products)?;

        let stored = state
            .sales
            .get_mut(&sale.id)
            .ok_or_else(|| DbError::not_found("Sale", sale.id))?;
        stored.date = sale.date;
        stored.product_ids = sale.product_ids();

        debug!(id = sale.id, date = %sale.date, "Updated sale");
        Ok(())
    }

    async fn delete(&self, id: SaleId) -> DbResult<bool> {
        let mut state = self.state.write().await;
        let removed = state.sales.remove(&id).is_some();
        if removed {
            debug!(id, "Deleted sale");
        }
        Ok(removed)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use ventas_core::Money;

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::with_products([Product::new(1, "Café", Money::new(dec!(2)))]);
        let other = store.clone();
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();

        let products = Catalog::list(&store).await.unwrap();
        let sale = SaleStore::insert(&store, date, &products).await.unwrap();

        assert!(SaleStore::get(&other, sale.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sale_ids_are_never_reused() {
        let store = MemoryStore::with_products([Product::new(1, "Café", Money::new(dec!(2)))]);
        let products = Catalog::list(&store).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();

        let first = SaleStore::insert(&store, date, &products).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());
        let second = SaleStore::insert(&store, date, &products).await.unwrap();

        assert!(second.id > first.id);
    }
}
