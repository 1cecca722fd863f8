//! # Sale Repository
//!
//! SQLite-backed [`SaleStore`].
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. INSERT   (one transaction)                                         │
//! │     └── INSERT sales → last_insert_rowid                               │
//! │     └── INSERT sale_products (sale_id, product_id, position) × n        │
//! │                                                                         │
//! │  2. UPDATE   (one transaction)                                         │
//! │     └── UPDATE sales SET sale_date                                     │
//! │     └── DELETE sale_products, re-INSERT the new list                   │
//! │                                                                         │
//! │  3. DELETE   (one transaction, order matters: no cascade)              │
//! │     └── DELETE sale_products WHERE sale_id                             │
//! │     └── DELETE sales WHERE id                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use tracing::debug;
use ventas_core::{Product, Sale, SaleId};

use super::product::parse_price;
use super::{SaleStore, SQLITE_MAX_VARIABLES};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    sale_date: NaiveDate,
}

/// One `sale_products` row joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct SaleProductRow {
    sale_id: i64,
    product_id: i64,
    name: String,
    price: String,
}

impl SaleProductRow {
    fn into_product(self) -> DbResult<Product> {
        let price = parse_price(self.product_id, &self.price)?;
        Ok(Product::new(self.product_id, self.name, price))
    }
}

const SALE_PRODUCTS_SELECT: &str = r#"
    SELECT sp.sale_id, p.id AS product_id, p.name, p.price
    FROM sale_products sp
    INNER JOIN products p ON p.id = sp.product_id
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

async fn commit(tx: Transaction<'static, Sqlite>) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

/// Bound values per `sale_products` row: sale_id, product_id, position.
const LINE_COLUMNS: usize = 3;

/// Rows per multi-row INSERT.
const LINES_PER_INSERT: usize = SQLITE_MAX_VARIABLES / LINE_COLUMNS;

/// Writes one `sale_products` row per product, numbered in list order.
/// Long lists take several INSERTs on the same transaction.
async fn insert_lines(
    tx: &mut Transaction<'static, Sqlite>,
    sale_id: SaleId,
    products: &[Product],
) -> DbResult<()> {
    for (batch, chunk) in products.chunks(LINES_PER_INSERT).enumerate() {
        let offset = batch * LINES_PER_INSERT;

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO sale_products (sale_id, product_id, position) ");
        query.push_values(chunk.iter().enumerate(), |mut row, (i, product)| {
            row.push_bind(sale_id)
                .push_bind(product.id)
                .push_bind((offset + i) as i64);
        });
        query.build().execute(&mut **tx).await?;
    }

    Ok(())
}

#[async_trait]
impl SaleStore for SaleRepository {
    async fn get(&self, id: SaleId) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as("SELECT id, sale_date FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            debug!(id, "Sale not found");
            return Ok(None);
        };

        let lines: Vec<SaleProductRow> = sqlx::query_as(&format!(
            "{SALE_PRODUCTS_SELECT} WHERE sp.sale_id = ?1 ORDER BY sp.position"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let products = lines
            .into_iter()
            .map(SaleProductRow::into_product)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Some(Sale::new(row.id, products, row.sale_date)))
    }

    async fn list(&self) -> DbResult<Vec<Sale>> {
        // both reads share one snapshot, so a concurrent delete cannot
        // leave a sale without its lines
        let mut tx = self.begin().await?;

        let rows: Vec<SaleRow> = sqlx::query_as("SELECT id, sale_date FROM sales ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;

        let lines: Vec<SaleProductRow> = sqlx::query_as(&format!(
            "{SALE_PRODUCTS_SELECT} ORDER BY sp.sale_id, sp.position"
        ))
        .fetch_all(&mut *tx)
        .await?;

        commit(tx).await?;

        let mut by_sale: HashMap<SaleId, Vec<Product>> = HashMap::new();
        for line in lines {
            let sale_id = line.sale_id;
            by_sale.entry(sale_id).or_default().push(line.into_product()?);
        }

        debug!(count = rows.len(), "Listed sales");

        Ok(rows
            .into_iter()
            .map(|row| {
                let products = by_sale.remove(&row.id).unwrap_or_default();
                Sale::new(row.id, products, row.sale_date)
            })
            .collect())
    }

    async fn insert(&self, date: NaiveDate, products: &[Product]) -> DbResult<Sale> {
        let mut tx = self.begin().await?;

        let result = sqlx::query("INSERT INTO sales (sale_date) VALUES (?1)")
            .bind(date)
            .execute(&mut *tx)
            .await?;
        let id = result.last_insert_rowid();

        insert_lines(&mut tx, id, products).await?;
        commit(tx).await?;

        debug!(id, %date, products = products.len(), "Inserted sale");
        Ok(Sale::new(id, products.to_vec(), date))
    }

    async fn update(&self, sale: &Sale) -> DbResult<()> {
        let mut tx = self.begin().await?;

        let result = sqlx::query("UPDATE sales SET sale_date = ?2 WHERE id = ?1")
            .bind(sale.id)
            .bind(sale.date)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale.id));
        }

        sqlx::query("DELETE FROM sale_products WHERE sale_id = ?1")
            .bind(sale.id)
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut tx, sale.id, &sale.products).await?;

        commit(tx).await?;

        debug!(id = sale.id, date = %sale.date, "Updated sale");
        Ok(())
    }

    async fn delete(&self, id: SaleId) -> DbResult<bool> {
        let mut tx = self.begin().await?;

        sqlx::query("DELETE FROM sale_products WHERE sale_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // nothing was there; dropping tx rolls back
            return Ok(false);
        }

        commit(tx).await?;

        debug!(id, "Deleted sale");
        Ok(true)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
