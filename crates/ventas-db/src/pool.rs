//! # SQLite Pool
//!
//! Opens the sales database and hands out repositories over one shared pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  storage.database_path, storage.max_connections   (apps/api config)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig ──► Database::new                                            │
//! │                 ├── journal_mode=WAL, synchronous=NORMAL               │
//! │                 ├── foreign_keys=ON (sale_products references)         │
//! │                 └── embedded migrations                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products() ─► ProductRepository     sales() ─► SaleRepository         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! WAL lets `SaleRepository::list` read a consistent snapshot while another
//! connection deletes.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;

/// Where the sales database lives and how many connections may be open.
///
/// ```rust
/// use ventas_db::DbConfig;
///
/// let config = DbConfig::new("ventas.db").max_connections(8);
/// assert_eq!(config.max_connections, 8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created on first open.
    pub database_path: PathBuf,

    /// Pool size. Default: 5
    pub max_connections: u32,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// A private `:memory:` database for tests.
    ///
    /// Each connection to `:memory:` opens its own empty database, so the
    /// pool is held to a single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
        }
    }
}

/// Handle to the sales database.
///
/// Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database and brings its schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Opening sales database"
        );

        let options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        migrations::run_migrations(&pool).await?;

        Ok(Database { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Waits for open connections to finish, then closes the pool. Later
    /// queries fail.
    pub async fn close(&self) {
        info!("Closing sales database");
        self.pool.close().await;
    }
}
