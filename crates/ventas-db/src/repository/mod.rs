//! # Repository Module
//!
//! Storage contracts for the Catalog and the Sale Ledger, with a SQLite and
//! an in-memory implementation of each.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Ledger (service)                                                      │
//! │       │                                                                 │
//! │       │  Arc<dyn Catalog>          Arc<dyn SaleStore>                  │
//! │       ▼                                    ▼                            │
//! │  ┌──────────────────────┐      ┌──────────────────────┐                │
//! │  │ ProductRepository    │      │ SaleRepository       │  (SQLite)      │
//! │  │ MemoryStore          │      │ MemoryStore          │  (in-memory)   │
//! │  └──────────────────────┘      └──────────────────────┘                │
//! │                                                                         │
//! │  Both backends pass the same contract tests (see ledger.rs).           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stores deal in resolved [`Sale`]s: product records are joined in whenever
//! a sale is read, so callers never see bare ids.

use async_trait::async_trait;
use chrono::NaiveDate;
use ventas_core::{Product, ProductId, Sale, SaleId};

use crate::error::DbResult;

pub mod memory;
pub mod product;
pub mod sale;

/// Upper bound on bound parameters in one SQLite statement
/// (`SQLITE_MAX_VARIABLE_NUMBER` since 3.32). Bulk statements are split
/// into batches that stay under it.
pub(crate) const SQLITE_MAX_VARIABLES: usize = 32_766;

// =============================================================================
// Catalog
// =============================================================================

/// Product lookup and administration.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// All products, ordered by id.
    async fn list(&self) -> DbResult<Vec<Product>>;

    /// The products whose id appears in `ids`, each at most once, ordered
    /// by id. Unknown ids are silently skipped.
    async fn find_by_ids(&self, ids: &[ProductId]) -> DbResult<Vec<Product>>;

    /// Adds a product. Fails with `UniqueViolation` if the id exists.
    async fn insert(&self, product: &Product) -> DbResult<()>;

    /// Number of products in the catalog.
    async fn count(&self) -> DbResult<i64>;
}

// =============================================================================
// Sale Store
// =============================================================================

/// Persistence of sales and their product lists.
///
/// The store assigns ids on insert (strictly increasing) and lists sales in
/// id order. Callers pass already-resolved products; the store only keeps
/// their ids and order.
#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn get(&self, id: SaleId) -> DbResult<Option<Sale>>;

    /// All sales in id order.
    async fn list(&self) -> DbResult<Vec<Sale>>;

    /// Persists a new sale and returns it with its assigned id.
    async fn insert(&self, date: NaiveDate, products: &[Product]) -> DbResult<Sale>;

    /// Replaces the date and the whole product list of an existing sale.
    /// Fails with `NotFound` if the sale does not exist.
    async fn update(&self, sale: &Sale) -> DbResult<()>;

    /// Removes the sale and its product rows. Returns false if absent.
    async fn delete(&self, id: SaleId) -> DbResult<bool>;

    /// Whether the backend can serve requests.
    async fn health_check(&self) -> bool {
        true
    }

    /// Short backend name for diagnostics.
    fn backend(&self) -> &'static str;
}
