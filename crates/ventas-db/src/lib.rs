//! # ventas-db: Storage Layer and Sale Ledger for Ventas
//!
//! This crate provides persistence for the catalog and the sales, and the
//! [`Ledger`] service that enforces the sale rules on top of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ventas Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (POST /api/ventas)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ventas-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Ledger     │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │  (ledger.rs)  │───►│ Catalog trait │    │  (embedded)  │  │   │
//! │  │   │               │    │ SaleStore     │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                 ┌──────────────┴──────────────┐                │   │
//! │  │                 ▼                             ▼                │   │
//! │  │        SQLite (pool.rs)              MemoryStore               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage and ledger error types
//! - [`repository`] - Catalog/SaleStore traits and their backends
//! - [`ledger`] - The Sale Ledger service
//! - [`demo`] - Demo catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ventas_db::{Database, DbConfig, Ledger};
//!
//! let db = Database::new(DbConfig::new("ventas.db")).await?;
//! let ledger = Ledger::sqlite(&db);
//!
//! let sale = ledger.create(&[1, 2], date).await?;
//! let sales_2023 = ledger.sales_by_year(YearRange::new(2023, 2023)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod demo;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, LedgerError, LedgerResult};
pub use ledger::Ledger;
pub use pool::{Database, DbConfig};

pub use repository::memory::MemoryStore;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::{Catalog, SaleStore};
