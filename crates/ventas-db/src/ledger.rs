//! # Sale Ledger
//!
//! The service every HTTP handler talks to. It validates input, resolves
//! product references against the [`Catalog`], persists through the
//! [`SaleStore`] and runs the pure filters from [`ventas_core::query`].
//!
//! ## Operation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create        validate ids ─► resolve (all-or-nothing) ─► insert      │
//! │  replace_date  parse date ─► lookup ─► update                          │
//! │  patch         lookup ─► parse date ─► resolve ids ─► update           │
//! │  delete        delete (join rows, then sale) ─► NotFound if absent     │
//! │                                                                         │
//! │  Every check runs before the first write: a failed call persists       │
//! │  nothing.                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use ventas_core::query::{self, SaleFilter};
use ventas_core::validation::{
    parse_sale_date, validate_price, validate_product_ids, validate_product_name,
};
use ventas_core::{
    CoreError, DayRange, MonthRange, Product, ProductFilter, ProductId, Sale, SaleId,
    SalePatch, ValidationError, YearRange,
};

use crate::error::{LedgerError, LedgerResult};
use crate::pool::Database;
use crate::repository::memory::MemoryStore;
use crate::repository::{Catalog, SaleStore};

/// Sale Ledger service over injected storage backends.
#[derive(Clone)]
pub struct Ledger {
    catalog: Arc<dyn Catalog>,
    sales: Arc<dyn SaleStore>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("backend", &self.sales.backend())
            .finish()
    }
}

impl Ledger {
    pub fn new(catalog: Arc<dyn Catalog>, sales: Arc<dyn SaleStore>) -> Self {
        Ledger { catalog, sales }
    }

    /// Ledger over a SQLite database.
    pub fn sqlite(db: &Database) -> Self {
        Ledger::new(Arc::new(db.products()), Arc::new(db.sales()))
    }

    /// Ledger over an in-memory store.
    pub fn memory(store: MemoryStore) -> Self {
        Ledger::new(Arc::new(store.clone()), Arc::new(store))
    }

    pub fn backend(&self) -> &'static str {
        self.sales.backend()
    }

    pub async fn health_check(&self) -> bool {
        self.sales.health_check().await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// All products ordered by id.
    pub async fn list_products(&self) -> LedgerResult<Vec<Product>> {
        Ok(self.catalog.list().await?)
    }

    pub async fn product_count(&self) -> LedgerResult<i64> {
        Ok(self.catalog.count().await?)
    }

    /// Validates and adds a catalog entry.
    pub async fn add_product(&self, product: Product) -> LedgerResult<Product> {
        validate_product_name(&product.name)?;
        validate_price(product.price)?;

        let product = Product::new(product.id, product.name.trim(), product.price);
        self.catalog.insert(&product).await?;

        debug!(id = product.id, "Product added to catalog");
        Ok(product)
    }

    /// Resolves ids to products, all-or-nothing.
    ///
    /// Each distinct id is looked up once; the result follows `ids` and keeps
    /// duplicates. Fails with `ProductsNotFound` listing every missing id.
    pub async fn resolve(&self, ids: &[ProductId]) -> LedgerResult<Vec<Product>> {
        let mut distinct = ids.to_vec();
        distinct.sort_unstable();
        distinct.dedup();

        let found = self.catalog.find_by_ids(&distinct).await?;
        Ok(query::resolve_products(ids, &found)?)
    }

    // =========================================================================
    // Sales
    // =========================================================================

    pub async fn get(&self, id: SaleId) -> LedgerResult<Sale> {
        self.sales
            .get(id)
            .await?
            .ok_or(LedgerError::Core(CoreError::SaleNotFound(id)))
    }

    /// All sales in id order.
    pub async fn list(&self) -> LedgerResult<Vec<Sale>> {
        Ok(self.sales.list().await?)
    }

    /// Creates a sale from product ids and a date.
    pub async fn create(&self, product_ids: &[ProductId], date: NaiveDate) -> LedgerResult<Sale> {
        validate_product_ids(product_ids)?;
        let products = self.resolve(product_ids).await?;

        let sale = self.sales.insert(date, &products).await?;

        info!(
            id = sale.id,
            date = %sale.date,
            products = sale.products.len(),
            total = %query::total(&sale),
            "Sale created"
        );
        Ok(sale)
    }

    /// Replaces the date of a sale.
    ///
    /// The date is checked before the lookup, so a bad date on a missing
    /// sale is a validation error, not a not-found.
    pub async fn replace_date(&self, id: SaleId, date: Option<&str>) -> LedgerResult<Sale> {
        let date = parse_sale_date(date.unwrap_or_default())?;

        let mut sale = self.get(id).await?;
        sale.date = date;
        self.sales.update(&sale).await?;

        info!(id, date = %date, "Sale date replaced");
        Ok(sale)
    }

    /// Applies a partial update: new date, new product list, or both.
    ///
    /// The sale is looked up first. Replacement products that cannot be
    /// resolved are reported as a validation error.
    pub async fn patch(
        &self,
        id: SaleId,
        date: Option<&str>,
        product_ids: Option<Vec<ProductId>>,
    ) -> LedgerResult<Sale> {
        let mut sale = self.get(id).await?;

        let patch = SalePatch {
            date: date.map(parse_sale_date).transpose()?,
            product_ids,
        };

        if patch.is_empty() {
            debug!(id, "Empty patch, nothing to change");
            return Ok(sale);
        }

        if let Some(ids) = &patch.product_ids {
            validate_product_ids(ids)?;
            sale.products = self.resolve(ids).await.map_err(|err| match err {
                LedgerError::Core(CoreError::ProductsNotFound { ids }) => {
                    ValidationError::UnresolvedProducts { ids }.into()
                }
                other => other,
            })?;
        }

        if let Some(date) = patch.date {
            sale.date = date;
        }

        self.sales.update(&sale).await?;

        info!(
            id,
            date = %sale.date,
            products = sale.products.len(),
            "Sale updated"
        );
        Ok(sale)
    }

    /// Deletes a sale and its product associations.
    pub async fn delete(&self, id: SaleId) -> LedgerResult<()> {
        if !self.sales.delete(id).await? {
            return Err(CoreError::SaleNotFound(id).into());
        }

        info!(id, "Sale deleted");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    async fn filtered<F: SaleFilter + Sync>(&self, filter: &F) -> LedgerResult<Vec<Sale>> {
        let sales = self.sales.list().await?;
        Ok(query::apply(sales, filter))
    }

    /// Sales that reference `product_id`, each once.
    pub async fn sales_by_product(&self, product_id: ProductId) -> LedgerResult<Vec<Sale>> {
        self.filtered(&ProductFilter(product_id)).await
    }

    pub async fn sales_by_year(&self, range: YearRange) -> LedgerResult<Vec<Sale>> {
        self.filtered(&range).await
    }

    pub async fn sales_by_month(&self, range: MonthRange) -> LedgerResult<Vec<Sale>> {
        self.filtered(&range).await
    }

    pub async fn sales_by_day(&self, range: DayRange) -> LedgerResult<Vec<Sale>> {
        self.filtered(&range).await
    }
}

// =============================================================================
// Contract Tests (both backends)
// =============================================================================
