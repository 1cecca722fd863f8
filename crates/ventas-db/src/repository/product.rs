//! # Product Repository
//!
//! SQLite-backed [`Catalog`].
//!
//! Prices are stored as decimal text and parsed back into [`Money`] on read,
//! so `"15.00"` comes back as `15.00` and not `15`.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use ventas_core::validation::validate_price;
use ventas_core::{Money, Product, ProductId};

use super::{Catalog, SQLITE_MAX_VARIABLES};
use crate::error::{DbError, DbResult};

/// Raw `products` row.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        Ok(Product::new(row.id, row.name, parse_price(row.id, &row.price)?))
    }
}

/// Decodes a stored price. A value that no longer parses, or that lies
/// outside the accepted price range, is corruption.
pub(crate) fn parse_price(product_id: ProductId, text: &str) -> DbResult<Money> {
    let price = text.parse::<Money>().map_err(|e| {
        DbError::Internal(format!("product {product_id} has unreadable price '{text}': {e}"))
    })?;

    validate_price(price).map_err(|e| {
        DbError::Internal(format!("product {product_id} has invalid stored price '{text}': {e}"))
    })?;

    Ok(price)
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let products = repo.find_by_ids(&[1, 2]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }
}

#[async_trait]
impl Catalog for ProductRepository {
    async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> =
            sqlx::query_as("SELECT id, name, price FROM products ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        debug!(count = rows.len(), "Listed products");
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut rows: Vec<ProductRow> = Vec::new();
        for batch in ids.chunks(SQLITE_MAX_VARIABLES) {
            let mut query: QueryBuilder<Sqlite> =
                QueryBuilder::new("SELECT id, name, price FROM products WHERE id IN (");
            let mut separated = query.separated(", ");
            for id in batch {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");

            rows.extend(query.build_query_as::<ProductRow>().fetch_all(&self.pool).await?);
        }

        // an id repeated across batches matches in each of them
        rows.sort_unstable_by_key(|row| row.id);
        rows.dedup_by_key(|row| row.id);

        debug!(requested = ids.len(), found = rows.len(), "Looked up products");
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, name = %product.name, "Inserting product");

        sqlx::query("INSERT INTO products (id, name, price) VALUES (?1, ?2, ?3)")
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("product id", product.id),
                other => other,
            })?;

        Ok(())
    }

    async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use rust_decimal_macros::dec;

    async fn repo() -> ProductRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
    }

    #[tokio::test]
    async fn test_insert_and_list_keeps_price_scale() {
        let repo = repo().await;
        repo.insert(&Product::new(2, "Cake", Money::new(dec!(25.00))))
            .await
            .unwrap();
        repo.insert(&Product::new(1, "Café", Money::new(dec!(15.00))))
            .await
            .unwrap();

        let products = repo.list().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, 1);
        assert_eq!(products[0].price.to_string(), "15.00");
        assert_eq!(products[1].name, "Cake");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_unique_violation() {
        let repo = repo().await;
        let product = Product::new(1, "Café", Money::new(dec!(1.50)));
        repo.insert(&product).await.unwrap();

        let err = repo.insert(&product).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_find_by_ids_dedupes_and_skips_unknown() {
        let repo = repo().await;
        for id in 1..=3 {
            repo.insert(&Product::new(id, format!("P{id}"), Money::new(dec!(1))))
                .await
                .unwrap();
        }

        let found = repo.find_by_ids(&[3, 1, 3, 99]).await.unwrap();
        assert_eq!(found.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);

        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_ids_past_the_variable_limit() {
        let repo = repo().await;
        for id in [1, 40_000] {
            repo.insert(&Product::new(id, format!("P{id}"), Money::new(dec!(1))))
                .await
                .unwrap();
        }

        let ids: Vec<ProductId> = (1..=SQLITE_MAX_VARIABLES as i64 + 10_000).collect();
        let found = repo.find_by_ids(&ids).await.unwrap();
        assert_eq!(found.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 40_000]);
    }

    #[tokio::test]
    async fn test_unreadable_price_is_internal_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO products (id, name, price) VALUES (1, 'Broken', 'n/a')")
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.products().list().await.unwrap_err();
        assert!(matches!(err, DbError::Internal(_)));
    }

    #[tokio::test]
    async fn test_stored_price_above_ceiling_is_internal_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO products (id, name, price) VALUES (1, 'Huge', ?1)")
            .bind(rust_decimal::Decimal::MAX.to_string())
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.products().find_by_ids(&[1]).await.unwrap_err();
        assert!(matches!(err, DbError::Internal(_)));
    }
}
